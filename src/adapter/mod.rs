//! Domain adapters over the chain.
//!
//! Adapters own the boundary between domain records and the chain's string
//! carrier: they build the cache key, encode values on the way in, and
//! decode on the way out. Two are provided, matching the standard chains:
//! [`namespaced::NamespacedCache`] for short-lived namespaced blobs and
//! [`secret::SecretCache`] for secret records with a relational authority.

pub mod namespaced;
pub mod secret;
