//! Error types for the site client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Local cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Local cache is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Local cache task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type SiteResult<T> = Result<T, SiteError>;
