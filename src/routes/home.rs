use crate::{
    AppState,
    dto::{HomeView, ViewQuery},
    routes::{post::load_posts, user::load_users},
};
use axum::{Json, extract::State};

/// GET /?user_id=2&search=...
///
/// The user list and the post list load side by side; neither waits on or
/// hides a failure of the other.
pub async fn home(State(state): State<AppState>, ViewQuery(query): ViewQuery) -> Json<HomeView> {
    let (users, posts) = tokio::join!(load_users(&state, &query), load_posts(&state, &query));

    Json(HomeView {
        query,
        users,
        posts,
    })
}
