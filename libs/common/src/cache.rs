//! Key-value store module for the portfolio backend
//!
//! This module provides the [`KeyValueStore`] capability the services persist
//! through, a Redis-backed implementation for deployments and an in-memory
//! implementation for local development and tests. Values are plain strings;
//! JSON documents go through [`get_json`] and [`set_json`].

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::info;

use crate::error::{StoreError, StoreResult};

/// Operations the services need from the backing store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Set a key-value pair with optional TTL
    ///
    /// Setting without a TTL clears any expiry the key had before.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()>;

    /// Remaining time to live in seconds, `None` for missing or persistent keys
    async fn ttl(&self, key: &str) -> StoreResult<Option<u64>>;

    /// Delete a key
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Push a value onto the head of a list
    async fn list_push(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Keep only the inclusive `start..=stop` range of a list
    async fn list_trim(&self, key: &str, start: isize, stop: isize) -> StoreResult<()>;

    /// Read the inclusive `start..=stop` range of a list
    async fn list_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>>;

    /// Check if the store is reachable
    async fn health_check(&self) -> StoreResult<bool>;
}

/// Read a JSON document stored under `key`
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StoreResult<Option<T>> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Replace the JSON document stored under `key`
pub async fn set_json<T: Serialize + Sync + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw, None).await
}

/// Which store implementation to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

/// Configuration for the key-value store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub redis: RedisConfig,
}

impl StoreConfig {
    /// Create a new StoreConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STORE_BACKEND`: `redis` or `memory` (default: "redis")
    /// - plus everything [`RedisConfig::from_env`] reads
    pub fn from_env() -> StoreResult<Self> {
        let backend = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "redis".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "redis" => StoreBackend::Redis,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(StoreError::Configuration(format!(
                    "Unknown STORE_BACKEND: {}",
                    other
                )));
            }
        };

        Ok(StoreConfig {
            backend,
            redis: RedisConfig::from_env(),
        })
    }
}

/// Open the configured store
pub async fn connect_store(config: &StoreConfig) -> StoreResult<Arc<dyn KeyValueStore>> {
    match config.backend {
        StoreBackend::Redis => Ok(Arc::new(RedisPool::new(&config.redis).await?)),
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Configuration for Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Self {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        RedisConfig { url }
    }
}

/// Redis-backed store
///
/// Holds one multiplexed connection; every command runs on a cheap clone of
/// it, so concurrent requests share a single socket.
#[derive(Clone)]
pub struct RedisPool {
    connection: MultiplexedConnection,
}

impl RedisPool {
    /// Connect to Redis
    pub async fn new(config: &RedisConfig) -> StoreResult<Self> {
        let client = Client::open(config.url.clone()).map_err(StoreError::Connection)?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(StoreError::Connection)?;
        info!("Redis connection established with URL: {}", config.url);
        Ok(RedisPool { connection })
    }

    fn get_connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }
}

#[async_trait]
impl KeyValueStore for RedisPool {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.get_connection();
        let value: Option<String> = conn.get(key).await.map_err(StoreError::Command)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()> {
        let mut conn = self.get_connection();

        if let Some(ttl) = ttl_seconds {
            let _: () = conn
                .set_ex(key, value, ttl)
                .await
                .map_err(StoreError::Command)?;
        } else {
            let _: () = conn.set(key, value).await.map_err(StoreError::Command)?;
        }

        Ok(())
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<u64>> {
        let mut conn = self.get_connection();
        // -2 means missing, -1 means no expiry
        let ttl: i64 = conn.ttl(key).await.map_err(StoreError::Command)?;
        Ok(u64::try_from(ttl).ok())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.get_connection();
        let _: u64 = conn.del(key).await.map_err(StoreError::Command)?;
        Ok(())
    }

    async fn list_push(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.get_connection();
        let _: u64 = conn.lpush(key, value).await.map_err(StoreError::Command)?;
        Ok(())
    }

    async fn list_trim(&self, key: &str, start: isize, stop: isize) -> StoreResult<()> {
        let mut conn = self.get_connection();
        let _: () = conn
            .ltrim(key, start, stop)
            .await
            .map_err(StoreError::Command)?;
        Ok(())
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        let mut conn = self.get_connection();
        let values: Vec<String> = conn
            .lrange(key, start, stop)
            .await
            .map_err(StoreError::Command)?;
        Ok(values)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        let mut conn = self.get_connection();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(StoreError::Command)?;
        Ok(pong == "PONG")
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Value(String),
    List(VecDeque<String>),
}

#[derive(Debug)]
struct MemoryEntry {
    slot: Slot,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-process store with Redis-like expiry and list semantics
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, MemoryEntry>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Drop `key` if it has expired, then hand out whatever is left
fn live_entry<'a>(
    entries: &'a mut HashMap<String, MemoryEntry>,
    key: &str,
    now: Instant,
) -> Option<&'a mut MemoryEntry> {
    if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

/// Resolve a Redis-style inclusive range against a list of `len` items
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = isize::try_from(len).ok()?;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len {
        return None;
    }

    Some((start as usize, stop as usize))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut entries = self.entries.lock().await;
        match live_entry(&mut entries, key, Instant::now()) {
            Some(MemoryEntry {
                slot: Slot::Value(value),
                ..
            }) => Ok(Some(value.clone())),
            Some(_) => Err(StoreError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        let expires_at = ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl));
        entries.insert(
            key.to_string(),
            MemoryEntry {
                slot: Slot::Value(value.to_string()),
                expires_at,
            },
        );
        Ok(())
    }

    async fn ttl(&self, key: &str) -> StoreResult<Option<u64>> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let remaining = live_entry(&mut entries, key, now)
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now))
            .map(|left| left.as_secs() + u64::from(left.subsec_nanos() > 0));
        Ok(remaining)
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn list_push(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        match live_entry(&mut entries, key, Instant::now()) {
            Some(MemoryEntry {
                slot: Slot::List(items),
                ..
            }) => items.push_front(value.to_string()),
            Some(_) => return Err(StoreError::WrongType(key.to_string())),
            None => {
                entries.insert(
                    key.to_string(),
                    MemoryEntry {
                        slot: Slot::List(VecDeque::from([value.to_string()])),
                        expires_at: None,
                    },
                );
            }
        }
        Ok(())
    }

    async fn list_trim(&self, key: &str, start: isize, stop: isize) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        let items = match live_entry(&mut entries, key, Instant::now()) {
            Some(MemoryEntry {
                slot: Slot::List(items),
                ..
            }) => items,
            Some(_) => return Err(StoreError::WrongType(key.to_string())),
            None => return Ok(()),
        };

        match resolve_range(items.len(), start, stop) {
            Some((from, to)) => {
                items.truncate(to + 1);
                items.drain(..from);
            }
            None => {
                entries.remove(key);
            }
        }
        Ok(())
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        let mut entries = self.entries.lock().await;
        match live_entry(&mut entries, key, Instant::now()) {
            Some(MemoryEntry {
                slot: Slot::List(items),
                ..
            }) => Ok(resolve_range(items.len(), start, stop)
                .map(|(from, to)| items.range(from..=to).cloned().collect())
                .unwrap_or_default()),
            Some(_) => Err(StoreError::WrongType(key.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}
