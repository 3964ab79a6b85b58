use serde::{Deserialize, Serialize};

use super::UserId;

/// A directory entry. The API sends more fields (address, phone, company);
/// only these four are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
}

impl User {
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.username.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
    }
}
