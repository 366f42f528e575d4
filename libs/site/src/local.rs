//! Local fallback cache
//!
//! One JSON file holding the last snapshot the site rendered from remote
//! content, plus the visitor's auto-season preference.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::SiteResult, snapshot::Snapshot};

/// File name used when no path is configured
pub const DEFAULT_CACHE_FILE: &str = "site-settings.json";

/// What the cache file holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSettings {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    #[serde(default = "default_auto_season")]
    pub auto_season: bool,
}

fn default_auto_season() -> bool {
    true
}

/// JSON file cache
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a cache from environment variables
    ///
    /// # Environment Variables
    /// - `SITE_CACHE_PATH`: Cache file location (default: ./site-settings.json)
    pub fn from_env() -> Self {
        let path = std::env::var("SITE_CACHE_PATH").unwrap_or_else(|_| DEFAULT_CACHE_FILE.to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache; `None` when nothing was cached yet
    pub fn load(&self) -> SiteResult<Option<CachedSettings>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// [`LocalCache::load`] on the blocking pool
    pub async fn load_async(&self) -> SiteResult<Option<CachedSettings>> {
        let cache = self.clone();
        tokio::task::spawn_blocking(move || cache.load()).await?
    }

    /// [`LocalCache::store`] on the blocking pool
    pub async fn store_async(&self, settings: CachedSettings) -> SiteResult<()> {
        let cache = self.clone();
        tokio::task::spawn_blocking(move || cache.store(&settings)).await?
    }

    /// Replace the cache contents
    pub fn store(&self, settings: &CachedSettings) -> SiteResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Write next to the target and rename, so readers never see half a file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(settings)?)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!("Cached site settings at {}", self.path.display());
        Ok(())
    }
}
