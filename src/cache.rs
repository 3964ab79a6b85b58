//! Session-lifetime memo of post lists keyed by (user, search term).
//!
//! No eviction and no expiry: the key space is one entry per user/term pair
//! visited, and the cache lives only as long as the process.

use crate::models::{Post, UserId};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// `"{user_id}-{term}"` with the term lowercased, matching the
/// case-insensitive filter. An absent term is the empty string.
pub fn cache_key(user_id: UserId, search: Option<&str>) -> String {
    format!("{}-{}", user_id, search.unwrap_or("").to_lowercase())
}

#[derive(Debug, Default)]
pub struct PostCache {
    entries: DashMap<String, Arc<Vec<Post>>>,
}

impl PostCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Vec<Post>>> {
        let hit = self.entries.get(key).map(|entry| Arc::clone(entry.value()));
        if hit.is_some() {
            debug!("Post cache hit for {}", key);
        }
        hit
    }

    /// Last write for a key wins.
    pub fn put(&self, key: String, posts: Vec<Post>) -> Arc<Vec<Post>> {
        let posts = Arc::new(posts);
        self.entries.insert(key, Arc::clone(&posts));
        posts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
