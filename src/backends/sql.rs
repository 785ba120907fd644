//! Relational authority store for secret records.
//!
//! The last tier of the secret chain. Rows live in a `secrets` table keyed
//! by the unique `secret_id` column; reads serialize the row to the chain's
//! JSON carrier so upper tiers receive the exact payload they would have
//! cached on a write, and writes decode that carrier back into a row.
//!
//! The database has no notion of expiry: reads report no TTL and writes
//! drop the deadline. Deletes are soft, the row keeps its identity and is
//! revived by the next upsert of the same `secret_id`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::time::Duration;
use tracing::info;

use crate::adapter::secret::Secret;
use crate::codec::{CacheCodec, JsonCodec};
use crate::error::{CacheError, Result};
use crate::traits::Store;

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS secrets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL DEFAULT '',
    name TEXT NOT NULL DEFAULT '',
    secret_id TEXT NOT NULL,
    secret_key TEXT NOT NULL DEFAULT '',
    expires INTEGER NOT NULL DEFAULT 0,
    status INTEGER NOT NULL DEFAULT 1,
    description TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL DEFAULT 0,
    deleted_at INTEGER
)";

const CREATE_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS uidx_secrets_secret_id ON secrets (secret_id)";

const SELECT_BY_SECRET_ID: &str = "\
SELECT id, user_id, name, secret_id, secret_key, expires, status, description, \
       created_at, updated_at \
FROM secrets WHERE secret_id = ? AND deleted_at IS NULL";

const UPSERT: &str = "\
INSERT INTO secrets (user_id, name, secret_id, secret_key, expires, status, description, \
                     created_at, updated_at, deleted_at) \
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL) \
ON CONFLICT(secret_id) DO UPDATE SET \
    user_id = excluded.user_id, \
    name = excluded.name, \
    secret_key = excluded.secret_key, \
    expires = excluded.expires, \
    status = excluded.status, \
    description = excluded.description, \
    updated_at = excluded.updated_at, \
    deleted_at = NULL";

/// Store over the relational `secrets` table.
pub struct SqlSecretStore {
    pool: SqlitePool,
    codec: JsonCodec,
}

impl SqlSecretStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            codec: JsonCodec,
        }
    }

    /// Connect to `database_url` (for example `sqlite:secrets.db`).
    ///
    /// # Errors
    ///
    /// Fails when the pool cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url).await?;
        info!(database_url = %database_url, "sql secret store connected");
        Ok(Self::new(pool))
    }

    /// Create the `secrets` table and its unique key index if absent.
    ///
    /// # Errors
    ///
    /// Fails when the schema statements cannot be executed.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    fn row_to_secret(row: &sqlx::sqlite::SqliteRow) -> Result<Secret> {
        Ok(Secret {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            secret_id: row.try_get("secret_id")?,
            secret_key: row.try_get("secret_key")?,
            expires: row.try_get("expires")?,
            status: row.try_get("status")?,
            description: row.try_get("description")?,
            created_at: epoch_to_datetime(row.try_get("created_at")?),
            updated_at: epoch_to_datetime(row.try_get("updated_at")?),
        })
    }
}

fn epoch_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[async_trait]
impl Store for SqlSecretStore {
    async fn get(&self, key: &str) -> Result<String> {
        let row = sqlx::query(SELECT_BY_SECRET_ID)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Err(CacheError::KeyNotFound);
        };

        let secret = Self::row_to_secret(&row)?;
        self.codec.encode(&secret)
    }

    async fn get_with_ttl(&self, key: &str) -> Result<(String, Option<Duration>)> {
        let value = self.get(key).await?;
        Ok((value, None))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let secret: Secret = self.codec.decode(value)?;
        let now = Utc::now().timestamp();
        sqlx::query(UPSERT)
            .bind(&secret.user_id)
            .bind(&secret.name)
            .bind(key)
            .bind(&secret.secret_key)
            .bind(secret.expires)
            .bind(secret.status)
            .bind(&secret.description)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: &str, _ttl: Duration) -> Result<()> {
        // Rows do not expire; the deadline is dropped.
        self.set(key, value).await
    }

    async fn del(&self, key: &str) -> Result<()> {
        sqlx::query("UPDATE secrets SET deleted_at = ? WHERE secret_id = ? AND deleted_at IS NULL")
            .bind(Utc::now().timestamp())
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("UPDATE secrets SET deleted_at = ? WHERE deleted_at IS NULL")
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn wait(&self) {}

    fn name(&self) -> &'static str {
        "sql"
    }
}
