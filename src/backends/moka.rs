//! Admission-controlled in-process store backed by Moka.
//!
//! The usual fastest tier of a chain. Moka buffers writes and applies its
//! admission policy asynchronously, so a write is not guaranteed to be
//! readable until [`Store::wait`] has drained the pending tasks.

use async_trait::async_trait;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::traits::Store;

#[derive(Debug, Clone)]
struct Entry {
    payload: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Instant::now() > expires_at)
    }

    fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires_at| expires_at.saturating_duration_since(Instant::now()))
            .filter(|remaining| !remaining.is_zero())
    }
}

/// Configuration for [`MokaStore`].
#[derive(Debug, Clone, Copy)]
pub struct MokaStoreConfig {
    /// Maximum number of entries admitted.
    pub max_capacity: u64,
    /// Upper bound on entry lifetime, applied on top of per-key deadlines.
    pub time_to_live: Duration,
    /// Idle time after which an entry is dropped.
    pub time_to_idle: Duration,
}

impl Default for MokaStoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: 2000,
            time_to_live: Duration::from_secs(3600),
            time_to_idle: Duration::from_secs(120),
        }
    }
}

/// In-process store with Moka's TinyLFU admission and eviction.
///
/// Per-key deadlines are tracked alongside the payload and enforced lazily
/// on read, the cache-wide bounds from [`MokaStoreConfig`] apply underneath.
pub struct MokaStore {
    cache: Cache<String, Entry>,
}

impl MokaStore {
    /// Create a store with the given bounds.
    #[must_use]
    pub fn new(config: MokaStoreConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.time_to_live)
            .time_to_idle(config.time_to_idle)
            .build();
        info!(capacity = config.max_capacity, "moka store initialized");
        Self { cache }
    }
}

impl Default for MokaStore {
    fn default() -> Self {
        Self::new(MokaStoreConfig::default())
    }
}

#[async_trait]
impl Store for MokaStore {
    async fn get(&self, key: &str) -> Result<String> {
        match self.cache.get(key).await {
            Some(entry) if entry.is_expired() => {
                self.cache.invalidate(key).await;
                Err(CacheError::KeyNotFound)
            }
            Some(entry) => Ok(entry.payload),
            None => Err(CacheError::KeyNotFound),
        }
    }

    async fn get_with_ttl(&self, key: &str) -> Result<(String, Option<Duration>)> {
        match self.cache.get(key).await {
            Some(entry) if entry.is_expired() => {
                self.cache.invalidate(key).await;
                Err(CacheError::KeyNotFound)
            }
            Some(entry) => {
                let remaining = entry.remaining();
                Ok((entry.payload, remaining))
            }
            None => Err(CacheError::KeyNotFound),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.cache
            .insert(
                key.to_owned(),
                Entry {
                    payload: value.to_owned(),
                    expires_at: None,
                },
            )
            .await;
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let expires_at = (!ttl.is_zero()).then(|| Instant::now() + ttl);
        self.cache
            .insert(
                key.to_owned(),
                Entry {
                    payload: value.to_owned(),
                    expires_at,
                },
            )
            .await;
        debug!(key = %key, ttl_secs = ttl.as_secs(), "moka store cached key");
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        Ok(())
    }

    async fn wait(&self) {
        // Drains Moka's write buffer so earlier inserts become readable.
        self.cache.run_pending_tasks().await;
    }

    fn name(&self) -> &'static str {
        "moka"
    }
}
