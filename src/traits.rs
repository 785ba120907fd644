//! Store and cache trait contracts.
//!
//! Two abstractions shape the crate:
//!
//! - [`Store`]: the single extensibility point. A store is one backend
//!   (in-process map, Moka, Redis, relational table) exposed through a
//!   uniform string key / string payload contract.
//! - [`Cache`]: the tier-facing contract consumed by chains and adapters.
//!   Both [`DelegateCache`](crate::DelegateCache) and
//!   [`ChainCache`](crate::ChainCache) implement it, so a chain can stack
//!   delegates, other chains, or any mix of the two.
//!
//! # Miss signalling
//!
//! A store reports an absent key only via
//! [`CacheError::KeyNotFound`](crate::CacheError::KeyNotFound). Every other
//! error means the backend itself failed and its state is unknown.
//!
//! # TTL semantics
//!
//! Remaining lifetimes are `Option<Duration>`. `None` means the backend
//! either does not track expiry (relational stores) or the entry has no
//! deadline. Backends that cannot honor a TTL on write accept it and drop it.
//!
//! # Example: custom store
//!
//! ```rust,ignore
//! use chain_cache::{async_trait, CacheError, Result, Store};
//! use std::time::Duration;
//!
//! struct MyStore { /* connection handle */ }
//!
//! #[async_trait]
//! impl Store for MyStore {
//!     async fn get(&self, key: &str) -> Result<String> {
//!         self.lookup(key).ok_or(CacheError::KeyNotFound)
//!     }
//!     // ... remaining operations
//! }
//! ```

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;
use crate::key::CacheKey;

/// A single cache backend.
///
/// Keys arrive already normalized to strings; payloads are the chain's
/// string carrier. Implementations must be safe for concurrent use.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the payload stored under `key`.
    ///
    /// Returns [`CacheError::KeyNotFound`](crate::CacheError::KeyNotFound)
    /// when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<String>;

    /// Fetch the payload together with its remaining lifetime.
    ///
    /// `None` when the backend does not track expiry or the entry never
    /// expires.
    async fn get_with_ttl(&self, key: &str) -> Result<(String, Option<Duration>)>;

    /// Store `value` under `key` with no expiry.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Store `value` under `key`, expiring after `ttl`.
    ///
    /// Backends without expiry support keep the value and ignore the
    /// deadline.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn del(&self, key: &str) -> Result<()>;

    /// Remove every entry.
    async fn clear(&self) -> Result<()>;

    /// Block until buffered writes are visible to reads.
    ///
    /// Admission-controlled backends acknowledge writes asynchronously;
    /// `wait` establishes a happens-before between a write and a subsequent
    /// read on the same store. Synchronous backends return immediately.
    async fn wait(&self);

    /// Backend name, for logs.
    fn name(&self) -> &'static str {
        "store"
    }
}

/// The tier-facing cache contract.
///
/// Identical to [`Store`] except that keys are accepted as any
/// [`CacheKey`] and normalized before hitting a backend. Chains treat each
/// tier purely through this trait, which is what allows a chain to contain
/// another chain.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch the payload stored under `key`.
    async fn get(&self, key: &dyn CacheKey) -> Result<String>;

    /// Fetch the payload together with its remaining lifetime.
    async fn get_with_ttl(&self, key: &dyn CacheKey) -> Result<(String, Option<Duration>)>;

    /// Store `value` under `key` with no expiry.
    async fn set(&self, key: &dyn CacheKey, value: &str) -> Result<()>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_with_ttl(&self, key: &dyn CacheKey, value: &str, ttl: Duration) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn del(&self, key: &dyn CacheKey) -> Result<()>;

    /// Remove every entry.
    async fn clear(&self) -> Result<()>;

    /// Block until buffered writes are visible to reads.
    async fn wait(&self);

    /// Tier name, for logs.
    fn name(&self) -> &'static str {
        "cache"
    }
}
