//! Error types shared by stores, caches, and adapters.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors produced by cache and store operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The key is absent from the store.
    ///
    /// This is the only way a store may signal a miss. The chain's read path
    /// consumes it as control flow and falls through to the next tier; any
    /// other error aborts the read.
    #[error("key not found")]
    KeyNotFound,

    /// Encoding or decoding a value failed. Always a hard error.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The backing store failed (connection loss, capacity, query error).
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl CacheError {
    /// Wrap an arbitrary backend error as a transport failure.
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Backend(err.into())
    }

    /// Whether this error is the miss sentinel.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound)
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(err.into())
    }
}

impl From<sqlx::Error> for CacheError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::KeyNotFound,
            other => Self::Backend(other.into()),
        }
    }
}
