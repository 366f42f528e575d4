//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use redis::RedisError;
use thiserror::Error;

/// Custom error type for key-value store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error occurred while opening a connection to the store
    #[error("Store connection error: {0}")]
    Connection(#[source] RedisError),

    /// Error occurred while executing a store command
    #[error("Store command error: {0}")]
    Command(#[source] RedisError),

    /// A list operation hit a plain value, or the other way round
    #[error("Wrong value type stored under key {0}")]
    WrongType(String),

    /// A stored document could not be encoded or decoded
    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Store configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while minting bearer tokens
#[derive(Error, Debug)]
pub enum TokenError {
    /// The signing secret is missing or unusable
    #[error("Token configuration error: {0}")]
    Configuration(String),

    /// The system clock is before the Unix epoch
    #[error("Failed to get current time: {0}")]
    Clock(#[from] std::time::SystemTimeError),

    /// Encoding the claims failed
    #[error("Failed to encode token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}
