//! Rate limiter for preventing brute force attacks on the admin login
//!
//! Failed attempts are counted per client in the shared store under
//! `ratelimit:login:<client>`. Every failure rewrites the counter with a fresh
//! lockout TTL, so the lockout lasts until a full window passes without a
//! failure.

use std::sync::Arc;

use axum::http::HeaderMap;
use common::{cache::KeyValueStore, error::StoreResult};
use tracing::{info, warn};

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Failed attempts allowed before the client is locked out
    pub max_attempts: u32,
    /// Lockout window in seconds
    pub lockout_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_seconds: 900, // 15 minutes
        }
    }
}

impl RateLimiterConfig {
    /// Create a new RateLimiterConfig from environment variables
    ///
    /// # Environment Variables
    /// - `LOGIN_MAX_ATTEMPTS`: Failed attempts before lockout (default: 5)
    /// - `LOGIN_LOCKOUT_SECONDS`: Lockout window in seconds (default: 900)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_attempts = std::env::var("LOGIN_MAX_ATTEMPTS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|&value| value > 0)
            .unwrap_or(defaults.max_attempts);

        let lockout_seconds = std::env::var("LOGIN_LOCKOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|&value| value > 0)
            .unwrap_or(defaults.lockout_seconds);

        Self {
            max_attempts,
            lockout_seconds,
        }
    }
}

/// Result of checking a client before its credentials are looked at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStatus {
    /// The client may try; `failures` is its current failure count
    Allowed { failures: u32 },
    /// The client is locked out for `retry_after` more seconds
    Locked { retry_after: u64 },
}

/// Store-backed login rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    store: Arc<dyn KeyValueStore>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self { config, store }
    }

    fn key(client_id: &str) -> String {
        format!("ratelimit:login:{}", client_id)
    }

    /// Check whether `client_id` may attempt a login
    pub async fn check(&self, client_id: &str) -> StoreResult<RateLimitStatus> {
        let key = Self::key(client_id);
        let failures = match self.store.get(&key).await? {
            Some(raw) => raw.parse::<u32>().unwrap_or_else(|_| {
                warn!("Ignoring unreadable failure counter for {}: {:?}", client_id, raw);
                0
            }),
            None => 0,
        };

        if failures < self.config.max_attempts {
            return Ok(RateLimitStatus::Allowed { failures });
        }

        // Counters always carry a TTL; none left means the window just ended
        match self.store.ttl(&key).await? {
            Some(remaining) => Ok(RateLimitStatus::Locked {
                retry_after: remaining.max(1),
            }),
            None => Ok(RateLimitStatus::Allowed { failures: 0 }),
        }
    }

    /// Record one more failure after `previous` ones; returns the attempts left
    pub async fn record_failure(&self, client_id: &str, previous: u32) -> StoreResult<u32> {
        let failures = previous.saturating_add(1);
        self.store
            .set(
                &Self::key(client_id),
                &failures.to_string(),
                Some(self.config.lockout_seconds),
            )
            .await?;

        if failures >= self.config.max_attempts {
            info!(
                "Locked out {} for {} seconds",
                client_id, self.config.lockout_seconds
            );
        }

        Ok(self.config.max_attempts.saturating_sub(failures))
    }

    /// Forget every failure recorded for `client_id`
    pub async fn reset(&self, client_id: &str) -> StoreResult<()> {
        self.store.delete(&Self::key(client_id)).await
    }
}

/// Identify the caller the way the reverse proxy reports it
///
/// Uses the first hop of `X-Forwarded-For`, then `X-Real-IP`, then `unknown`.
/// Both headers are client-controlled unless the proxy overwrites them.
pub fn client_id(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(',').next().unwrap_or(value).trim().to_string())
            .filter(|value| !value.is_empty())
    };

    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .unwrap_or_else(|| "unknown".to_string())
}
