use crate::{
    AppState,
    dto::{FAVORITES_FAILED, FavoriteIds, FavoriteStatus, FavoritesView, LoadState, NO_FAVORITES, PostCard},
    errors::ApiError,
    models::PostId,
};
use axum::{
    Json,
    extract::{Path, State},
};
use futures::future::try_join_all;
use tracing::{debug, error};

/// GET /favorites
///
/// Fetches every starred post in parallel. One failed fetch fails the view.
pub async fn list_favorites(State(state): State<AppState>) -> Json<FavoritesView> {
    let ids = starred_ids(&state);
    if ids.is_empty() {
        return Json(FavoritesView {
            posts: LoadState::empty(NO_FAVORITES),
        });
    }

    let posts = match try_join_all(ids.iter().map(|&id| state.gateway.get_post(id))).await {
        Ok(posts) => LoadState::from_items(
            posts.iter().map(|post| PostCard::new(post, true)).collect(),
            NO_FAVORITES,
        ),
        Err(e) => {
            error!("Failed to load starred posts: {}", e);
            LoadState::failed(FAVORITES_FAILED)
        }
    };

    Json(FavoritesView { posts })
}

/// GET /favorites/ids
pub async fn favorite_ids(State(state): State<AppState>) -> Json<FavoriteIds> {
    Json(FavoriteIds {
        ids: starred_ids(&state),
        hydration: state.favorites.hydration(),
    })
}

/// PUT /favorites/{id}
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let post_id = parse_post_id(&raw_id)?;
    state.favorites.add(post_id);

    Ok(Json(FavoriteStatus {
        post_id,
        favorite: true,
    }))
}

/// DELETE /favorites/{id}
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let post_id = parse_post_id(&raw_id)?;
    state.favorites.remove(post_id);

    Ok(Json(FavoriteStatus {
        post_id,
        favorite: false,
    }))
}

/// POST /favorites/{id}/toggle
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let post_id = parse_post_id(&raw_id)?;
    let favorite = state.favorites.toggle(post_id);

    Ok(Json(FavoriteStatus { post_id, favorite }))
}

/// Starred ids in the order they were starred.
fn starred_ids(state: &AppState) -> Vec<PostId> {
    state.favorites.snapshot().iter().copied().collect()
}

fn parse_post_id(raw_id: &str) -> Result<PostId, ApiError> {
    raw_id.parse().map_err(|_| {
        debug!("Rejected favorite id {:?}", raw_id);
        ApiError::ValidationError(format!("Invalid post id: {raw_id}"))
    })
}
