//! Delegate cache: the typed facade over a single store.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::key::CacheKey;
use crate::traits::{Cache, Store};

/// A cache tier backed by exactly one [`Store`].
///
/// The delegate holds no state of its own. It normalizes whatever key type
/// the caller presents into the canonical string form and forwards every
/// operation to its store, which makes any store usable as a chain tier.
pub struct DelegateCache {
    store: Arc<dyn Store>,
}

impl DelegateCache {
    /// Wrap a store as a cache tier.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Cache for DelegateCache {
    async fn get(&self, key: &dyn CacheKey) -> Result<String> {
        self.store.get(&key.cache_key()).await
    }

    async fn get_with_ttl(&self, key: &dyn CacheKey) -> Result<(String, Option<Duration>)> {
        self.store.get_with_ttl(&key.cache_key()).await
    }

    async fn set(&self, key: &dyn CacheKey, value: &str) -> Result<()> {
        self.store.set(&key.cache_key(), value).await
    }

    async fn set_with_ttl(&self, key: &dyn CacheKey, value: &str, ttl: Duration) -> Result<()> {
        self.store.set_with_ttl(&key.cache_key(), value, ttl).await
    }

    async fn del(&self, key: &dyn CacheKey) -> Result<()> {
        self.store.del(&key.cache_key()).await
    }

    async fn clear(&self) -> Result<()> {
        self.store.clear().await
    }

    async fn wait(&self) {
        self.store.wait().await;
    }

    fn name(&self) -> &'static str {
        self.store.name()
    }
}
