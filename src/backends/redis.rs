//! Remote store backed by Redis.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::traits::Store;

/// Networked store over a Redis instance.
///
/// Uses a `ConnectionManager` so a dropped connection is re-established
/// transparently. Redis acknowledges writes synchronously, so `wait` is a
/// no-op.
pub struct RedisStore {
    conn_manager: ConnectionManager,
}

impl RedisStore {
    /// Connect using the `REDIS_URL` environment variable, falling back to
    /// `redis://127.0.0.1:6379`.
    ///
    /// # Errors
    ///
    /// Fails when the client cannot be created or the server does not
    /// answer a `PING`.
    pub async fn new() -> Result<Self> {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        Self::with_url(&redis_url).await
    }

    /// Connect to a specific Redis URL.
    ///
    /// # Errors
    ///
    /// Fails when the client cannot be created or the server does not
    /// answer a `PING`.
    pub async fn with_url(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url)?;
        let conn_manager = ConnectionManager::new(client).await?;

        let mut conn = conn_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        info!(redis_url = %redis_url, "redis store connected");
        Ok(Self { conn_manager })
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<String> {
        let mut conn = self.conn_manager.clone();
        let value: Option<String> = conn.get(key).await?;
        value.ok_or(CacheError::KeyNotFound)
    }

    async fn get_with_ttl(&self, key: &str) -> Result<(String, Option<Duration>)> {
        let mut conn = self.conn_manager.clone();
        let value: Option<String> = conn.get(key).await?;
        let Some(value) = value else {
            return Err(CacheError::KeyNotFound);
        };

        // TTL returns -1 for keys without expiry and -2 for missing keys.
        let ttl_secs: i64 = conn.ttl(key).await?;
        let ttl = u64::try_from(ttl_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Ok((value, ttl))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return self.set(key, value).await;
        }
        let mut conn = self.conn_manager.clone();
        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        debug!(key = %key, ttl_secs = ttl.as_secs(), "redis store cached key");
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = redis::cmd("FLUSHALL").query_async(&mut conn).await?;
        Ok(())
    }

    async fn wait(&self) {}

    fn name(&self) -> &'static str {
        "redis"
    }
}
