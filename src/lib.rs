//! Chain cache
//!
//! A composable multi-tier caching library. Heterogeneous backing stores
//! (in-process admission-controlled cache, Redis, relational database) are
//! unified behind one ordered pipeline with read-through promotion and
//! write-through fan-out:
//!
//! ```text
//! read  → tier 0 (moka) → tier 1 (redis) → tier 2 (sql)
//!          miss ↓           miss ↓           hit: value flows back,
//!                                            promoted into tiers 0..k
//! write → tier 0          → tier 1         → tier 2   (every tier, in order)
//! ```
//!
//! Every tier moves the same carrier: a string payload under a string key.
//! Domain encoding lives in the adapters, so the pipeline itself is typed
//! end to end and any [`Store`] can sit at any position.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chain_cache::{Blob, MemoryStore, NamespacedCache};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> chain_cache::Result<()> {
//!     let local = Arc::new(MemoryStore::new());
//!     let remote = Arc::new(MemoryStore::new());
//!     let cache = NamespacedCache::two_tier(local, remote)?;
//!
//!     let blob = Blob::new("example.com/Greeting", b"hello".to_vec());
//!     cache.set("tenants", "greeting", &blob, None).await?;
//!
//!     let (found, ttl) = cache.get("tenants", "greeting").await?;
//!     assert_eq!(found, blob);
//!     assert!(ttl.is_none());
//!     Ok(())
//! }
//! ```
//!
//! # Building blocks
//!
//! - [`Store`]: the backend contract and the single extensibility point.
//! - [`DelegateCache`]: one store exposed as a tier, with key
//!   normalization.
//! - [`ChainCache`]: the ordered pipeline. Implements [`Cache`] itself, so
//!   chains nest.
//! - [`NamespacedCache`] / [`SecretCache`]: the domain adapters over the
//!   standard two- and three-tier chains.

pub mod adapter;
pub mod backends;
pub mod chain;
pub mod codec;
pub mod delegate;
pub mod error;
pub mod key;
pub mod traits;

pub use adapter::namespaced::{Blob, NamespacedCache, NamespacedKey};
pub use adapter::secret::{Secret, SecretCache};
pub use backends::{MemoryStore, MokaStore, MokaStoreConfig, RedisStore, SqlSecretStore};
pub use chain::{ChainBuilder, ChainCache, ChainStats};
pub use codec::{CacheCodec, JsonCodec};
pub use delegate::DelegateCache;
pub use error::{CacheError, Result};
pub use key::{CacheKey, HashedKey};
pub use traits::{Cache, Store};

// Re-exported so store implementers outside the crate do not need their own
// async-trait dependency.
pub use async_trait::async_trait;
