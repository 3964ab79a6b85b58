use crate::{
    AppState,
    dto::{LoadState, NO_USERS, USERS_FAILED, UserEntry, UserListView, ViewQuery},
    query::QueryState,
};
use axum::{Json, extract::State};
use tracing::error;

/// Fetches the directory and keeps users whose name, username or email
/// contains the search term, ignoring case.
pub async fn load_users(state: &AppState, query: &QueryState) -> LoadState<Vec<UserEntry>> {
    let users = match state.gateway.list_users().await {
        Ok(users) => users,
        Err(e) => {
            error!("Failed to load users: {}", e);
            return LoadState::failed(USERS_FAILED);
        }
    };

    let needle = query.search_term().to_lowercase();
    let entries = users
        .into_iter()
        .filter(|user| needle.is_empty() || user.matches(&needle))
        .map(|user| UserEntry::new(user, query.user_id))
        .collect();

    LoadState::from_items(entries, NO_USERS)
}

/// GET /users?user_id=2&search=...
pub async fn list_users(
    State(state): State<AppState>,
    ViewQuery(query): ViewQuery,
) -> Json<UserListView> {
    let users = load_users(&state, &query).await;

    Json(UserListView { query, users })
}
