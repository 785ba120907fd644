//! Namespaced blob adapter over a two-tier chain.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::chain::ChainCache;
use crate::codec::{CacheCodec, JsonCodec};
use crate::delegate::DelegateCache;
use crate::error::Result;
use crate::key::CacheKey;
use crate::traits::{Cache, Store};

/// A key scoped to a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacedKey {
    /// Namespace the entry belongs to.
    pub namespace: String,
    /// Caller-facing key within the namespace.
    pub key: String,
}

impl NamespacedKey {
    /// Create a key scoped to `namespace`.
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

impl CacheKey for NamespacedKey {
    fn cache_key(&self) -> String {
        format!("namespace:{}:{}", self.namespace, self.key)
    }
}

/// An opaque payload tagged with the type it claims to carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    /// Identifies the shape of `data` to the producer and consumer.
    pub type_url: String,
    /// The payload bytes, opaque to the cache.
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl Blob {
    /// Wrap payload bytes under a type tag.
    pub fn new(type_url: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            type_url: type_url.into(),
            data: data.into(),
        }
    }
}

/// High-throughput blob cache: local tier backed by a remote tier.
///
/// Keys are laid out as `namespace:<namespace>:<key>`; values are [`Blob`]s
/// encoded to the carrier with the adapter's codec. Nothing here persists
/// beyond the remote tier, so a blob absent from both tiers is simply gone.
pub struct NamespacedCache<C: CacheCodec = JsonCodec> {
    chain: ChainCache,
    codec: C,
}

impl NamespacedCache<JsonCodec> {
    /// Drive an existing chain with the default JSON codec.
    #[must_use]
    pub fn new(chain: ChainCache) -> Self {
        Self::with_codec(chain, JsonCodec)
    }

    /// Build the standard two-tier chain, local store first.
    ///
    /// # Errors
    ///
    /// Fails when the chain cannot be constructed.
    pub fn two_tier(local: Arc<dyn Store>, remote: Arc<dyn Store>) -> Result<Self> {
        let chain = ChainCache::builder()
            .tier(Arc::new(DelegateCache::new(local)))
            .tier(Arc::new(DelegateCache::new(remote)))
            .build()?;
        Ok(Self::new(chain))
    }
}

impl<C: CacheCodec> NamespacedCache<C> {
    /// Drive an existing chain with a specific codec.
    pub fn with_codec(chain: ChainCache, codec: C) -> Self {
        Self { chain, codec }
    }

    /// The underlying chain.
    pub fn chain(&self) -> &ChainCache {
        &self.chain
    }

    /// Store `value` under `key` in `namespace`, optionally expiring.
    ///
    /// # Errors
    ///
    /// Encoding failures and tier write failures are surfaced; encoding
    /// failures win when both occur.
    pub async fn set(
        &self,
        namespace: &str,
        key: &str,
        value: &Blob,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let cache_key = NamespacedKey::new(namespace, key);
        let payload = self.codec.encode(value)?;
        match ttl {
            Some(ttl) => self.chain.set_with_ttl(&cache_key, &payload, ttl).await,
            None => self.chain.set(&cache_key, &payload).await,
        }
    }

    /// Fetch the blob under `key` in `namespace` with its remaining TTL.
    ///
    /// # Errors
    ///
    /// `KeyNotFound` when every tier misses; decode failures are hard
    /// errors.
    pub async fn get(&self, namespace: &str, key: &str) -> Result<(Blob, Option<Duration>)> {
        let cache_key = NamespacedKey::new(namespace, key);
        let (payload, ttl) = self.chain.get_with_ttl(&cache_key).await?;
        Ok((self.codec.decode(&payload)?, ttl))
    }

    /// Remove the blob under `key` in `namespace` from every tier.
    ///
    /// # Errors
    ///
    /// The first tier failure is surfaced after the fan-out completes.
    pub async fn del(&self, namespace: &str, key: &str) -> Result<()> {
        let cache_key = NamespacedKey::new(namespace, key);
        self.chain.del(&cache_key).await
    }

    /// Block until buffered writes on every tier are readable.
    pub async fn wait(&self) {
        self.chain.wait().await;
    }
}
