// ============================================================================
// POSTBOARD - directory/forum viewer over a read-only REST API
// ============================================================================

// - User list with search filtering
// - Per-user post lists, cached per (user, search) pair
// - Post detail with comments
// - Starred posts persisted on disk
// - Structured logging

use postboard::{
    AppState,
    config::Config,
    favorites::{FavoritesStore, storage::FileStorage},
    gateway::Gateway,
    router,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("postboard=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let gateway = Gateway::new(&config.api_base_url)?;
    let storage = Arc::new(FileStorage::new(&config.data_dir));
    let favorites = Arc::new(FavoritesStore::open(storage));

    let state = AppState::new(gateway, favorites);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    info!("Server running on http://{}", config.bind_addr);
    info!("Remote API: {}", config.api_base_url);
    info!("Favorites stored in {}", config.data_dir.display());
    info!("Endpoints:");
    info!("  GET    /health                 - Health check");
    info!("  GET    /                       - Users and posts for ?user_id=&search=");
    info!("  GET    /users                  - User list (?search=)");
    info!("  GET    /posts                  - Posts of ?user_id= (?search=)");
    info!("  GET    /posts/{{id}}             - Post detail with comments");
    info!("  GET    /favorites              - Starred posts");
    info!("  GET    /favorites/ids          - Starred post ids");
    info!("  PUT    /favorites/{{id}}         - Star a post");
    info!("  DELETE /favorites/{{id}}         - Unstar a post");
    info!("  POST   /favorites/{{id}}/toggle  - Flip a star");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
