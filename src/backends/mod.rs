//! Backing store implementations.
//!
//! Each backend implements the [`Store`](crate::Store) contract and covers
//! one position of the standard chains:
//!
//! - [`MokaStore`] - admission-controlled in-process cache, the usual
//!   fastest tier. TTL-aware; writes are buffered, so `wait` drains them.
//! - [`RedisStore`] - remote networked cache. TTL-aware.
//! - [`SqlSecretStore`] - relational authority for secret records. Ignores
//!   TTLs and serializes rows to the chain's JSON carrier.
//! - [`MemoryStore`] - plain concurrent map. A reference implementation,
//!   also what the integration tests stack chains from.

pub mod memory;
pub mod moka;
pub mod redis;
pub mod sql;

pub use memory::MemoryStore;
pub use moka::{MokaStore, MokaStoreConfig};
pub use redis::RedisStore;
pub use sql::SqlSecretStore;
