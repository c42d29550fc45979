use std::{net::SocketAddr, sync::Arc};

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accounts_backend::{
    config::Config,
    repositories::AccountRepository,
    routes,
    services::LocalAvatarStorage,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accounts_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        media_root = %config.media_root.display(),
        max_request_bytes = config.max_request_bytes,
        "Loaded configuration from environment/.env"
    );

    // Initialize database
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    tokio::fs::create_dir_all(&config.media_root).await?;

    let state = AppState::new(
        Arc::new(AccountRepository::new(pool)),
        Arc::new(LocalAvatarStorage::new(config.media_root.clone())),
        config.clone(),
    );
    let app = routes::router(state);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
