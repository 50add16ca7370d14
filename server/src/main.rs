mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use config::{ConfigError, ServerConfig};
use services::blob::{BlobError, HttpBlobStore};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("blob client: {0}")]
    Blob(#[from] BlobError),
    #[error("server io: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    // A missing .env file is normal in production.
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "ignoring unreadable .env");
        }
    }

    let config = ServerConfig::from_env()?;
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;
    let blobs = HttpBlobStore::new(&config.blob)?;
    let state = state::AppState::new(pool, Arc::new(blobs), config.expose_error_details);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, "vision board listening");
    axum::serve(listener, app).await?;
    Ok(())
}
