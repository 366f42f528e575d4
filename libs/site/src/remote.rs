//! Public API client
//!
//! Only the unauthenticated reads are used: `GET /projects` and
//! `GET /settings`. The site never sends a bearer token.

use std::time::Duration;

use common::models::{Project, SettingsBundle};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{SiteError, SiteResult},
    snapshot::Snapshot,
};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

/// Reads the published content from the API service
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: Client,
    base_url: String,
}

impl RemoteSource {
    /// Create a client for the API at `base_url`, e.g. `http://localhost:3001`
    pub fn new(base_url: &str, timeout_seconds: u64) -> SiteResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("portfolio-site/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from environment variables
    ///
    /// # Environment Variables
    /// - `SITE_API_URL`: Base URL of the API service (default: http://localhost:3001)
    /// - `SITE_API_TIMEOUT`: Request timeout in seconds (default: 5)
    pub fn from_env() -> SiteResult<Self> {
        let base_url =
            std::env::var("SITE_API_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());
        let timeout_seconds = std::env::var("SITE_API_TIMEOUT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        Self::new(&base_url, timeout_seconds)
    }

    /// Visible projects, in display order
    pub async fn projects(&self) -> SiteResult<Vec<Project>> {
        self.get_json("/projects").await
    }

    /// The public settings bundle
    pub async fn settings(&self) -> SiteResult<SettingsBundle> {
        self.get_json("/settings").await
    }

    /// Both documents; fails if either request does
    pub async fn snapshot(&self) -> SiteResult<Snapshot> {
        Ok(Snapshot {
            projects: self.projects().await?,
            settings: self.settings().await?,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SiteResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SiteError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
