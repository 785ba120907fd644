//! Shared helpers for the integration tests.

#![allow(dead_code)]

use chain_cache::{
    CacheError, ChainCache, DelegateCache, MemoryStore, Result, Store, async_trait,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Unique key so tests never collide on shared backends.
pub fn test_key(name: &str) -> String {
    format!("test_{}_{}", name, rand::random::<u32>())
}

/// Build a chain of delegate tiers over the given stores, nearest first.
pub fn chain_over(stores: Vec<Arc<dyn Store>>) -> ChainCache {
    let mut builder = ChainCache::builder();
    for store in stores {
        builder = builder.tier(Arc::new(DelegateCache::new(store)));
    }
    builder.build().unwrap()
}

/// Memory store wrapper that counts reads and can be armed to fail reads
/// or writes, for observing how the chain reacts to tier failures.
#[derive(Default)]
pub struct InstrumentedStore {
    inner: MemoryStore,
    gets: AtomicU64,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InstrumentedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_count(&self) -> u64 {
        self.gets.load(Ordering::Relaxed)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn injected(kind: &str) -> CacheError {
        CacheError::backend(std::io::Error::other(format!("injected {kind} failure")))
    }
}

#[async_trait]
impl Store for InstrumentedStore {
    async fn get(&self, key: &str) -> Result<String> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(Self::injected("read"));
        }
        self.inner.get(key).await
    }

    async fn get_with_ttl(&self, key: &str) -> Result<(String, Option<Duration>)> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(Self::injected("read"));
        }
        self.inner.get_with_ttl(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(Self::injected("write"));
        }
        self.inner.set(key, value).await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(Self::injected("write"));
        }
        self.inner.set_with_ttl(key, value, ttl).await
    }

    async fn del(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(Self::injected("delete"));
        }
        self.inner.del(key).await
    }

    async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }

    async fn wait(&self) {
        self.inner.wait().await;
    }

    fn name(&self) -> &'static str {
        "instrumented"
    }
}
