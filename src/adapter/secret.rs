//! Secret adapter over a three-tier chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::chain::ChainCache;
use crate::codec::{CacheCodec, JsonCodec};
use crate::delegate::DelegateCache;
use crate::error::Result;
use crate::traits::{Cache, Store};

/// A structured secret record.
///
/// `secret_id` doubles as the cache key. `id` and the timestamps are owned
/// by the relational tier; a record read back through the database carries
/// the values the row was stored with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    /// Row identity, assigned by the relational tier.
    pub id: i64,
    /// Owner of the secret.
    pub user_id: String,
    /// Human-readable name.
    pub name: String,
    /// Unique identifier, also the cache key.
    pub secret_id: String,
    /// The secret material.
    pub secret_key: String,
    /// Expiry as epoch seconds, 0 for no expiry.
    pub expires: i64,
    /// Lifecycle status, 1 for active.
    pub status: i32,
    /// Free-form description.
    pub description: String,
    /// Creation time, assigned by the relational tier.
    pub created_at: DateTime<Utc>,
    /// Last update time, assigned by the relational tier.
    pub updated_at: DateTime<Utc>,
}

/// Secret cache: local and remote tiers in front of a relational authority.
///
/// Values are encoded to the carrier once at this boundary; the relational
/// tier produces the same encoding on its own reads, so a record promoted
/// out of the database is byte-identical to one cached on a write.
pub struct SecretCache<C: CacheCodec = JsonCodec> {
    chain: ChainCache,
    codec: C,
}

impl SecretCache<JsonCodec> {
    /// Drive an existing chain with the default JSON codec.
    #[must_use]
    pub fn new(chain: ChainCache) -> Self {
        Self::with_codec(chain, JsonCodec)
    }

    /// Build the standard three-tier chain: local, remote, then the
    /// authoritative relational store.
    ///
    /// # Errors
    ///
    /// Fails when the chain cannot be constructed.
    pub fn three_tier(
        local: Arc<dyn Store>,
        remote: Arc<dyn Store>,
        authority: Arc<dyn Store>,
    ) -> Result<Self> {
        let chain = ChainCache::builder()
            .tier(Arc::new(DelegateCache::new(local)))
            .tier(Arc::new(DelegateCache::new(remote)))
            .tier(Arc::new(DelegateCache::new(authority)))
            .build()?;
        Ok(Self::new(chain))
    }
}

impl<C: CacheCodec> SecretCache<C> {
    /// Drive an existing chain with a specific codec.
    pub fn with_codec(chain: ChainCache, codec: C) -> Self {
        Self { chain, codec }
    }

    /// The underlying chain.
    pub fn chain(&self) -> &ChainCache {
        &self.chain
    }

    /// Store or update a secret in every tier.
    ///
    /// # Errors
    ///
    /// Encoding failures and tier write failures are surfaced; encoding
    /// failures win when both occur.
    pub async fn set(&self, key: &str, secret: &Secret) -> Result<()> {
        let payload = self.codec.encode(secret)?;
        let key = key.to_owned();
        self.chain.set(&key, &payload).await
    }

    /// Fetch the secret under `key`.
    ///
    /// # Errors
    ///
    /// `KeyNotFound` when every tier misses, including the authority;
    /// decode failures are hard errors.
    pub async fn get(&self, key: &str) -> Result<Secret> {
        let key = key.to_owned();
        let payload = self.chain.get(&key).await?;
        self.codec.decode(&payload)
    }

    /// Remove the secret under `key` from every tier.
    ///
    /// # Errors
    ///
    /// The first tier failure is surfaced after the fan-out completes.
    pub async fn del(&self, key: &str) -> Result<()> {
        let key = key.to_owned();
        self.chain.del(&key).await
    }

    /// Block until buffered writes on every tier are readable.
    pub async fn wait(&self) {
        self.chain.wait().await;
    }
}
