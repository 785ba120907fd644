//! Cache key normalization.
//!
//! Stores index entries by plain strings. Callers may hold richer key types;
//! the [`CacheKey`] capability turns them into the canonical string form
//! before any store is touched. Strings pass through verbatim, domain key
//! types render themselves, and [`HashedKey`] covers values with no natural
//! string form.

use std::any::TypeId;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A value usable as a cache key.
///
/// The string returned must be identical for every lookup of the same
/// logical entry, since it is what every tier of a chain ultimately indexes
/// by.
pub trait CacheKey: Send + Sync {
    /// Render the canonical string form of this key.
    fn cache_key(&self) -> String;
}

impl CacheKey for str {
    fn cache_key(&self) -> String {
        self.to_owned()
    }
}

impl CacheKey for String {
    fn cache_key(&self) -> String {
        self.clone()
    }
}

/// Fallback for key values without a natural string form.
///
/// Produces a hex digest of the value's runtime type and contents, so two
/// values of different types never collide on an equal representation. The
/// digest is stable within a process; keys intended to survive restarts or
/// be shared between nodes should implement [`CacheKey`] directly instead.
pub struct HashedKey<T>(pub T);

impl<T> CacheKey for HashedKey<T>
where
    T: Hash + Send + Sync + 'static,
{
    fn cache_key(&self) -> String {
        let mut digest = DefaultHasher::new();
        TypeId::of::<T>().hash(&mut digest);
        self.0.hash(&mut digest);
        format!("{:016x}", digest.finish())
    }
}
