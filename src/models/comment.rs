use serde::{Deserialize, Serialize};

use super::PostId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub post_id: PostId,
    pub name: String,
    pub email: String,
    pub body: String,
}
