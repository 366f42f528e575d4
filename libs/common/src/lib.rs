//! Common library for the portfolio backend
//!
//! This crate provides shared functionality used across the services and the
//! site client, including the key-value store, bearer tokens, the content
//! models, error handling, and HTTP plumbing.

pub mod cache;
pub mod error;
pub mod http;
pub mod models;
pub mod token;

/// Example usage of the cache module
///
/// ```rust,no_run
/// use common::cache::{StoreConfig, connect_store};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = StoreConfig::from_env()?;
///     let store = connect_store(&config).await?;
///     let is_healthy = store.health_check().await?;
///     println!("Store health check: {}", is_healthy);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
