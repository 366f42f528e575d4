use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod authenticator;
mod error;
mod middleware;
mod models;
mod password;
mod rate_limiter;
mod repositories;
mod routes;
mod validation;

use common::{
    cache::{KeyValueStore, StoreConfig, connect_store},
    http::ServerConfig,
    token::{TokenConfig, TokenService},
};
use tokio::net::TcpListener;

use crate::{
    authenticator::{Authenticator, AuthenticatorConfig},
    password::{Argon2Config, Argon2Verifier},
    rate_limiter::RateLimiterConfig,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub token_service: TokenService,
    pub authenticator: Authenticator,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting authentication service");

    // Initialize the key-value store
    let store_config = StoreConfig::from_env()?;
    let store = connect_store(&store_config).await?;

    if store.health_check().await? {
        info!("Store connection successful");
    } else {
        anyhow::bail!("Failed to connect to store");
    }

    // Initialize token service
    let token_service = TokenService::new(TokenConfig::from_env()?);

    let authenticator_config = AuthenticatorConfig::from_env();
    if authenticator_config.fallback_secret.is_none() {
        info!("ADMIN_PASSWORD is not set; logins need a stored credential");
    }

    let verifier = Arc::new(Argon2Verifier::new(&Argon2Config::from_env())?);
    let authenticator = Authenticator::new(
        authenticator_config,
        RateLimiterConfig::from_env(),
        store.clone(),
        verifier,
        token_service.clone(),
    );

    let app_state = AppState {
        store,
        token_service,
        authenticator,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let addr = ServerConfig::from_env("AUTH_PORT", 3000).addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Authentication service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
