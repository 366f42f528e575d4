use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod backup;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;

use common::{
    cache::{StoreConfig, connect_store},
    http::ServerConfig,
    token::{TokenConfig, TokenService},
};
use tokio::net::TcpListener;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting API service");

    // Initialize the key-value store
    let store_config = StoreConfig::from_env()?;
    let store = connect_store(&store_config).await?;

    if store.health_check().await? {
        info!("Store connection successful");
    } else {
        anyhow::bail!("Failed to connect to store");
    }

    // Tokens are minted by the auth service; this service only verifies them
    let token_service = TokenService::new(TokenConfig::from_env()?);

    let app_state = AppState::new(store, token_service);

    // Start the web server
    let app = routes::create_router(app_state);

    let addr = ServerConfig::from_env("API_PORT", 3001).addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
