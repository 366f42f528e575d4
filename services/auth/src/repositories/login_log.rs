//! Login audit log repository
//!
//! Entries are JSON documents in a store list, newest first, capped at
//! [`LOGIN_LOG_LIMIT`] entries.

use std::sync::Arc;

use common::{cache::KeyValueStore, error::StoreResult};
use tracing::warn;

use crate::models::LoginLogEntry;

/// Key holding the login audit list
pub const LOGIN_LOG_KEY: &str = "admin:login_log";

/// Number of entries kept in the log
pub const LOGIN_LOG_LIMIT: usize = 100;

/// Bounded, newest-first log of successful logins
#[derive(Clone)]
pub struct LoginLogRepository {
    store: Arc<dyn KeyValueStore>,
}

impl LoginLogRepository {
    /// Create a new login log repository
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record a login and drop whatever falls past the cap
    pub async fn append(&self, entry: &LoginLogEntry) -> StoreResult<()> {
        let raw = serde_json::to_string(entry)?;
        self.store.list_push(LOGIN_LOG_KEY, &raw).await?;
        self.store
            .list_trim(LOGIN_LOG_KEY, 0, LOGIN_LOG_LIMIT as isize - 1)
            .await
    }

    /// Up to `limit` most recent entries, newest first
    pub async fn recent(&self, limit: usize) -> StoreResult<Vec<LoginLogEntry>> {
        let limit = limit.clamp(1, LOGIN_LOG_LIMIT);
        let raw_entries = self
            .store
            .list_range(LOGIN_LOG_KEY, 0, limit as isize - 1)
            .await?;

        Ok(raw_entries
            .iter()
            .filter_map(|raw| match serde_json::from_str(raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable login log entry: {}", e);
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::cache::MemoryStore;

    fn entry(n: i64) -> LoginLogEntry {
        LoginLogEntry {
            ip: format!("10.0.0.{}", n),
            timestamp: Utc.timestamp_opt(1_700_000_000 + n, 0).unwrap(),
            user_agent: Some("test-agent".to_string()),
        }
    }

    #[tokio::test]
    async fn test_log_is_newest_first_and_capped() {
        let log = LoginLogRepository::new(Arc::new(MemoryStore::new()));
        for n in 0..(LOGIN_LOG_LIMIT as i64 + 5) {
            log.append(&entry(n)).await.unwrap();
        }

        let all = log.recent(LOGIN_LOG_LIMIT).await.unwrap();
        assert_eq!(all.len(), LOGIN_LOG_LIMIT);
        assert_eq!(all[0], entry(LOGIN_LOG_LIMIT as i64 + 4));
        assert_eq!(all[LOGIN_LOG_LIMIT - 1], entry(5));

        let latest = log.recent(2).await.unwrap();
        assert_eq!(latest, vec![entry(104), entry(103)]);
    }

    #[tokio::test]
    async fn test_unreadable_entries_are_skipped() {
        let store = MemoryStore::new();
        store.list_push(LOGIN_LOG_KEY, "not json").await.unwrap();
        let log = LoginLogRepository::new(Arc::new(store));
        log.append(&entry(1)).await.unwrap();

        assert_eq!(log.recent(10).await.unwrap(), vec![entry(1)]);
    }
}
