use crate::favorites::HydrationKind;
use crate::models::{Comment, Post, PostId, User, UserId};
use crate::query::QueryState;
use serde::Serialize;

pub const USERS_FAILED: &str = "Failed to load users";
pub const POSTS_FAILED: &str = "Failed to load posts";
pub const POST_FAILED: &str = "Failed to load post";
pub const COMMENTS_FAILED: &str = "Failed to load comments";
pub const FAVORITES_FAILED: &str = "Failed to load starred posts";
pub const INVALID_POST_ID: &str = "Invalid post id";

pub const NO_USERS: &str = "No users found";
pub const NO_MATCHES: &str = "No posts match your search";
pub const NO_POSTS: &str = "This user has no posts yet";
pub const SELECT_USER: &str = "Select a user to see their posts";
pub const NO_COMMENTS: &str = "No comments yet";
pub const NO_FAVORITES: &str = "You have not starred any posts yet";

const EXCERPT_CHARS: usize = 100;

/// Result of one load operation. Each section of a view carries its own,
/// so one failing load never hides the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState<T> {
    Failed { message: String },
    Empty { message: String },
    Ready { data: T },
}

impl<T> LoadState<T> {
    pub fn failed(message: &str) -> Self {
        LoadState::Failed {
            message: message.to_string(),
        }
    }

    pub fn empty(message: &str) -> Self {
        LoadState::Empty {
            message: message.to_string(),
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// `Empty` with `empty_message` for an empty collection, `Ready` otherwise.
    pub fn from_items(items: Vec<T>, empty_message: &str) -> Self {
        if items.is_empty() {
            Self::empty(empty_message)
        } else {
            LoadState::Ready { data: items }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserEntry {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub selected: bool,
}

impl UserEntry {
    pub fn new(user: User, selected: Option<UserId>) -> Self {
        Self {
            selected: selected == Some(user.id),
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub excerpt: String,
    pub favorite: bool,
}

impl PostCard {
    pub fn new(post: &Post, favorite: bool) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title.clone(),
            excerpt: excerpt(&post.body),
            favorite,
        }
    }
}

/// First 100 characters of `body`, with `...` appended when cut.
pub fn excerpt(body: &str) -> String {
    match body.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub query: QueryState,
    pub users: LoadState<Vec<UserEntry>>,
    pub posts: LoadState<Vec<PostCard>>,
}

#[derive(Debug, Serialize)]
pub struct UserListView {
    pub query: QueryState,
    pub users: LoadState<Vec<UserEntry>>,
}

#[derive(Debug, Serialize)]
pub struct PostListView {
    pub query: QueryState,
    pub posts: LoadState<Vec<PostCard>>,
}

#[derive(Debug, Serialize)]
pub struct PostDetailView {
    pub post: LoadState<PostDetail>,
    /// Absent when the id was invalid and nothing was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<LoadState<Vec<Comment>>>,
}

#[derive(Debug, Serialize)]
pub struct FavoritesView {
    pub posts: LoadState<Vec<PostCard>>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub post_id: PostId,
    pub favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoriteIds {
    pub ids: Vec<PostId>,
    pub hydration: HydrationKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_body_is_kept_whole() {
        assert_eq!(excerpt("short"), "short");
        assert_eq!(excerpt(&"a".repeat(100)), "a".repeat(100));
    }

    #[test]
    fn long_body_is_cut_on_a_char_boundary() {
        let body = "é".repeat(150);
        assert_eq!(excerpt(&body), format!("{}...", "é".repeat(100)));
    }

    #[test]
    fn load_state_serializes_with_tag() {
        let ready: LoadState<Vec<u8>> = LoadState::from_items(vec![1], NO_USERS);
        assert_eq!(
            serde_json::to_value(&ready).unwrap(),
            json!({ "state": "ready", "data": [1] })
        );

        let empty: LoadState<Vec<u8>> = LoadState::from_items(vec![], NO_USERS);
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            json!({ "state": "empty", "message": NO_USERS })
        );
    }

    #[test]
    fn user_entry_marks_selection() {
        let user = User {
            id: 2,
            name: "Ervin Howell".into(),
            username: "Antonette".into(),
            email: "Shanna@melissa.tv".into(),
        };
        assert!(UserEntry::new(user.clone(), Some(2)).selected);
        assert!(!UserEntry::new(user, None).selected);
    }
}
