pub mod favorite;
pub mod health;
pub mod home;
pub mod post;
pub mod user;

use crate::{AppState, errors::ApiError};
use axum::{
    Router,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/", get(home::home))
        .route("/users", get(user::list_users))
        .route("/posts", get(post::list_posts))
        .route("/posts/{id}", get(post::get_post))
        .route("/favorites", get(favorite::list_favorites))
        .route("/favorites/ids", get(favorite::favorite_ids))
        .route(
            "/favorites/{id}",
            put(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route("/favorites/{id}/toggle", post(favorite::toggle_favorite))
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
