//! Chain cache: ordered composition of tiers with read-through promotion
//! and write-through fan-out.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::key::CacheKey;
use crate::traits::Cache;

/// An ordered sequence of cache tiers behind a single [`Cache`] surface.
///
/// Tier 0 is the fastest and the promotion target; the last tier is the
/// authoritative one. The ordering is fixed at construction.
///
/// Reads walk the tiers in order. A miss falls through to the next tier; a
/// hit at tier `k` back-fills the value into tiers `0..k` before returning.
/// Any error other than the miss sentinel aborts the read, because a tier
/// whose state is unknown must not be silently skipped in favor of deeper,
/// possibly stale data.
///
/// Writes and deletes fan out to every tier in order, best-effort: all tiers
/// are attempted even when one fails, and the first failure is surfaced
/// afterwards. A transient failure on a volatile tier must not keep the
/// authoritative tier from being updated.
///
/// Since `ChainCache` itself implements [`Cache`], a chain is a valid tier
/// of another chain.
pub struct ChainCache {
    tiers: Vec<Arc<dyn Cache>>,
    tier_hits: Vec<AtomicU64>,
    misses: AtomicU64,
    promotions: AtomicU64,
    promotion_failures: AtomicU64,
}

/// Builder for [`ChainCache`], tiers added nearest first.
#[derive(Default)]
pub struct ChainBuilder {
    tiers: Vec<Arc<dyn Cache>>,
}

impl ChainBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Append the next tier. The first call adds the fastest tier, the last
    /// call the authoritative one.
    #[must_use]
    pub fn tier(mut self, tier: Arc<dyn Cache>) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Build the chain.
    ///
    /// # Errors
    ///
    /// Fails when no tier was added.
    pub fn build(self) -> Result<ChainCache> {
        ChainCache::new(self.tiers)
    }
}

/// Counters observed by a chain since construction.
#[derive(Debug, Clone)]
pub struct ChainStats {
    /// Hits per tier, index 0 being the fastest tier.
    pub tier_hits: Vec<u64>,
    /// Reads that missed on every tier.
    pub misses: u64,
    /// Successful promotion writes into upper tiers.
    pub promotions: u64,
    /// Promotion writes that failed and were swallowed.
    pub promotion_failures: u64,
}

impl ChainCache {
    /// Create a chain over the given tiers, nearest first.
    ///
    /// # Errors
    ///
    /// Fails when `tiers` is empty.
    pub fn new(tiers: Vec<Arc<dyn Cache>>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(CacheError::backend(anyhow::anyhow!(
                "a chain requires at least one tier"
            )));
        }
        let tier_hits = tiers.iter().map(|_| AtomicU64::new(0)).collect();
        Ok(Self {
            tiers,
            tier_hits,
            misses: AtomicU64::new(0),
            promotions: AtomicU64::new(0),
            promotion_failures: AtomicU64::new(0),
        })
    }

    /// Start building a chain tier by tier.
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Number of tiers in this chain.
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Snapshot of the chain's counters.
    #[must_use]
    pub fn stats(&self) -> ChainStats {
        ChainStats {
            tier_hits: self
                .tier_hits
                .iter()
                .map(|hits| hits.load(Ordering::Relaxed))
                .collect(),
            misses: self.misses.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            promotion_failures: self.promotion_failures.load(Ordering::Relaxed),
        }
    }

    fn record_hit(&self, index: usize) {
        if let Some(hits) = self.tier_hits.get(index) {
            hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_write_error(&self, index: usize, tier: &Arc<dyn Cache>, err: &CacheError) {
        warn!(
            tier = index,
            backend = tier.name(),
            error = %err,
            "tier write failed, continuing fan-out"
        );
    }

    /// Back-fill a value read from tier `hit_index` into tiers `0..hit_index`.
    ///
    /// Runs nearest tier first so a concurrent reader of the same key sees
    /// upper tiers converge in lookup order. Failures are logged and
    /// swallowed: promotion warms the cache, it is not part of the read's
    /// correctness contract.
    async fn promote(&self, key: &String, value: &str, ttl: Option<Duration>, hit_index: usize) {
        let ttl = ttl.filter(|ttl| !ttl.is_zero());
        for (index, tier) in self.tiers.iter().take(hit_index).enumerate() {
            let outcome = match ttl {
                Some(ttl) => tier.set_with_ttl(key, value, ttl).await,
                None => tier.set(key, value).await,
            };
            match outcome {
                Ok(()) => {
                    self.promotions.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, from = hit_index, to = index, "promoted entry");
                }
                Err(err) => {
                    self.promotion_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        key = %key,
                        tier = index,
                        backend = tier.name(),
                        error = %err,
                        "promotion write failed"
                    );
                }
            }
        }
    }
}

#[async_trait]
impl Cache for ChainCache {
    async fn get(&self, key: &dyn CacheKey) -> Result<String> {
        // Normalize once so every tier sees the identical key bytes.
        let key = key.cache_key();
        for (index, tier) in self.tiers.iter().enumerate() {
            match tier.get(&key).await {
                Ok(value) => {
                    self.record_hit(index);
                    self.promote(&key, &value, None, index).await;
                    return Ok(value);
                }
                Err(CacheError::KeyNotFound) => {}
                Err(err) => return Err(err),
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        Err(CacheError::KeyNotFound)
    }

    async fn get_with_ttl(&self, key: &dyn CacheKey) -> Result<(String, Option<Duration>)> {
        let key = key.cache_key();
        for (index, tier) in self.tiers.iter().enumerate() {
            match tier.get_with_ttl(&key).await {
                Ok((value, ttl)) => {
                    self.record_hit(index);
                    self.promote(&key, &value, ttl, index).await;
                    return Ok((value, ttl));
                }
                Err(CacheError::KeyNotFound) => {}
                Err(err) => return Err(err),
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        Err(CacheError::KeyNotFound)
    }

    async fn set(&self, key: &dyn CacheKey, value: &str) -> Result<()> {
        let key = key.cache_key();
        let mut first_error = None;
        for (index, tier) in self.tiers.iter().enumerate() {
            if let Err(err) = tier.set(&key, value).await {
                self.record_write_error(index, tier, &err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn set_with_ttl(&self, key: &dyn CacheKey, value: &str, ttl: Duration) -> Result<()> {
        let key = key.cache_key();
        let mut first_error = None;
        for (index, tier) in self.tiers.iter().enumerate() {
            if let Err(err) = tier.set_with_ttl(&key, value, ttl).await {
                self.record_write_error(index, tier, &err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn del(&self, key: &dyn CacheKey) -> Result<()> {
        let key = key.cache_key();
        let mut first_error = None;
        for (index, tier) in self.tiers.iter().enumerate() {
            if let Err(err) = tier.del(&key).await {
                self.record_write_error(index, tier, &err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn clear(&self) -> Result<()> {
        let mut first_error = None;
        for (index, tier) in self.tiers.iter().enumerate() {
            if let Err(err) = tier.clear().await {
                self.record_write_error(index, tier, &err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn wait(&self) {
        for tier in &self.tiers {
            tier.wait().await;
        }
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}
