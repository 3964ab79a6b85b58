use crate::{cache::PostCache, favorites::FavoritesStore, gateway::Gateway};
use std::sync::Arc;

// ============================================================================
// APPLICATION STATE - Shared by every request
// ============================================================================
/// `Gateway` wraps a `reqwest::Client`, which is already reference counted,
/// so cloning the state is cheap.
///
/// The favorites store and the post cache are the only shared mutable
/// parts. Both are safe to use from concurrent handlers without extra locks.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub cache: Arc<PostCache>,
    pub favorites: Arc<FavoritesStore>,
}

impl AppState {
    pub fn new(gateway: Gateway, favorites: Arc<FavoritesStore>) -> Self {
        Self {
            gateway,
            cache: Arc::new(PostCache::new()),
            favorites,
        }
    }
}
