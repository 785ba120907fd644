//! In-memory store over a concurrent map.
//!
//! A reference backend with no eviction policy. Expiry is tracked per entry
//! and enforced lazily on read.

use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

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

/// Concurrent in-memory store.
///
/// Unbounded; expired entries are removed when read. Suitable as a test
/// double for any tier and as a template for custom backends.
#[derive(Default)]
pub struct MemoryStore {
    map: DashMap<String, Entry>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries, expired ones included until they are read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn lookup(&self, key: &str) -> Result<Entry> {
        if let Some(entry) = self.map.get(key) {
            if entry.is_expired() {
                drop(entry);
                self.map.remove(key);
                return Err(CacheError::KeyNotFound);
            }
            return Ok(entry.clone());
        }
        Err(CacheError::KeyNotFound)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<String> {
        self.lookup(key).map(|entry| entry.payload)
    }

    async fn get_with_ttl(&self, key: &str) -> Result<(String, Option<Duration>)> {
        let entry = self.lookup(key)?;
        let remaining = entry.remaining();
        Ok((entry.payload, remaining))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.map.insert(
            key.to_owned(),
            Entry {
                payload: value.to_owned(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let expires_at = (!ttl.is_zero()).then(|| Instant::now() + ttl);
        self.map.insert(
            key.to_owned(),
            Entry {
                payload: value.to_owned(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.map.clear();
        Ok(())
    }

    async fn wait(&self) {}

    fn name(&self) -> &'static str {
        "memory"
    }
}
