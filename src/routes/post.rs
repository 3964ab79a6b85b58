use crate::{
    AppState,
    cache::cache_key,
    dto::{
        COMMENTS_FAILED, INVALID_POST_ID, LoadState, NO_COMMENTS, NO_MATCHES, NO_POSTS,
        POST_FAILED, POSTS_FAILED, PostCard, PostDetail, PostDetailView, PostListView,
        SELECT_USER, ViewQuery,
    },
    models::PostId,
    query::QueryState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::{debug, error};

/// Posts of the selected user, narrowed by the search term. Served from the
/// cache when this (user, term) pair was loaded before; nothing is fetched
/// when no user is selected.
pub async fn load_posts(state: &AppState, query: &QueryState) -> LoadState<Vec<PostCard>> {
    let Some(user_id) = query.user_id else {
        return LoadState::empty(SELECT_USER);
    };

    let term = query.search_term();
    let key = cache_key(user_id, query.search.as_deref());

    let posts = match state.cache.get(&key) {
        Some(posts) => posts,
        None => {
            let fetched = if term.is_empty() {
                state.gateway.get_user_posts(user_id).await
            } else {
                state.gateway.search_posts(term, Some(user_id)).await
            };

            match fetched {
                Ok(posts) => state.cache.put(key, posts),
                Err(e) => {
                    error!("Failed to load posts for user {}: {}", user_id, e);
                    return LoadState::failed(POSTS_FAILED);
                }
            }
        }
    };

    let favorites = state.favorites.snapshot();
    let cards = posts
        .iter()
        .map(|post| PostCard::new(post, favorites.contains(&post.id)))
        .collect();

    LoadState::from_items(cards, if term.is_empty() { NO_POSTS } else { NO_MATCHES })
}

/// GET /posts?user_id=2&search=...
pub async fn list_posts(
    State(state): State<AppState>,
    ViewQuery(query): ViewQuery,
) -> Json<PostListView> {
    let posts = load_posts(&state, &query).await;

    Json(PostListView { query, posts })
}

/// GET /posts/{id}
///
/// The post and its comments load concurrently with separate outcomes, so
/// failing comments still leave the post readable. A non-numeric id is
/// answered with 400 before anything is fetched.
pub async fn get_post(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> (StatusCode, Json<PostDetailView>) {
    let Ok(post_id) = raw_id.parse::<PostId>() else {
        debug!("Rejected post id {:?}", raw_id);
        return (
            StatusCode::BAD_REQUEST,
            Json(PostDetailView {
                post: LoadState::failed(INVALID_POST_ID),
                comments: None,
            }),
        );
    };

    let (post, comments) = tokio::join!(
        state.gateway.get_post(post_id),
        state.gateway.get_comments_for_post(post_id)
    );

    let post = match post {
        Ok(post) => LoadState::Ready {
            data: PostDetail {
                favorite: state.favorites.is_favorite(post.id),
                post,
            },
        },
        Err(e) => {
            error!("Failed to load post {}: {}", post_id, e);
            LoadState::failed(POST_FAILED)
        }
    };

    let comments = match comments {
        Ok(comments) => LoadState::from_items(comments, NO_COMMENTS),
        Err(e) => {
            error!("Failed to load comments for post {}: {}", post_id, e);
            LoadState::failed(COMMENTS_FAILED)
        }
    };

    (
        StatusCode::OK,
        Json(PostDetailView {
            post,
            comments: Some(comments),
        }),
    )
}
