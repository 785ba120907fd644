//! Domain adapters: namespaced blobs over two tiers, secrets over three
//! tiers with a relational authority.

use chrono::DateTime;
use chain_cache::{Blob, MemoryStore, NamespacedCache, Secret, SecretCache, SqlSecretStore, Store};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::test_key;

fn sample_secret(secret_id: &str) -> Secret {
    let stamp = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    Secret {
        id: 0,
        user_id: "user-1".to_string(),
        name: "deploy token".to_string(),
        secret_id: secret_id.to_string(),
        secret_key: "s3cr3t".to_string(),
        expires: 1_800_000_000,
        status: 1,
        description: "token for the deploy pipeline".to_string(),
        created_at: stamp,
        updated_at: stamp,
    }
}

async fn sqlite_store() -> Arc<SqlSecretStore> {
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SqlSecretStore::new(pool);
    store.migrate().await.unwrap();
    Arc::new(store)
}

#[tokio::test]
async fn namespaced_keys_are_visible_to_raw_tiers() {
    let local = Arc::new(MemoryStore::new());
    let remote = Arc::new(MemoryStore::new());
    let cache = NamespacedCache::two_tier(local.clone(), remote.clone()).unwrap();

    let blob = Blob::new("example.com/Greeting", b"hello".to_vec());
    cache.set("n", "k", &blob, None).await.unwrap();
    cache.wait().await;

    let raw = local.get("namespace:n:k").await.unwrap();
    assert_eq!(raw, serde_json::to_string(&blob).unwrap());
    assert_eq!(remote.get("namespace:n:k").await.unwrap(), raw);
}

#[tokio::test]
async fn namespaced_round_trip_with_ttl() {
    let cache = NamespacedCache::two_tier(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    )
    .unwrap();

    let blob = Blob::new("example.com/Report", vec![1, 2, 3, 4]);
    cache
        .set("reports", "daily", &blob, Some(Duration::from_secs(300)))
        .await
        .unwrap();

    let (found, ttl) = cache.get("reports", "daily").await.unwrap();
    assert_eq!(found, blob);
    let ttl = ttl.unwrap();
    assert!(ttl <= Duration::from_secs(300));
    assert!(!ttl.is_zero());
}

#[tokio::test]
async fn namespaced_delete_removes_the_blob() {
    let local = Arc::new(MemoryStore::new());
    let remote = Arc::new(MemoryStore::new());
    let cache = NamespacedCache::two_tier(local.clone(), remote.clone()).unwrap();

    let blob = Blob::new("example.com/Tmp", b"x".to_vec());
    cache.set("n", "gone", &blob, None).await.unwrap();
    cache.del("n", "gone").await.unwrap();
    cache.wait().await;

    assert!(cache.get("n", "gone").await.unwrap_err().is_not_found());
    assert!(local.get("namespace:n:gone").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn same_key_in_different_namespaces_does_not_collide() {
    let cache = NamespacedCache::two_tier(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    )
    .unwrap();

    let left = Blob::new("example.com/A", b"left".to_vec());
    let right = Blob::new("example.com/B", b"right".to_vec());
    cache.set("alpha", "k", &left, None).await.unwrap();
    cache.set("beta", "k", &right, None).await.unwrap();

    assert_eq!(cache.get("alpha", "k").await.unwrap().0, left);
    assert_eq!(cache.get("beta", "k").await.unwrap().0, right);
}

#[tokio::test]
async fn secret_round_trip_through_the_chain() {
    let local = Arc::new(MemoryStore::new());
    let remote = Arc::new(MemoryStore::new());
    let sql = sqlite_store().await;
    let cache = SecretCache::three_tier(local, remote, sql.clone()).unwrap();

    let key = test_key("secret_roundtrip");
    let secret = sample_secret(&key);
    cache.set(&key, &secret).await.unwrap();
    cache.wait().await;

    // Served from the fastest tier: the adapter's own encoding round-trips.
    assert_eq!(cache.get(&key).await.unwrap(), secret);

    // The authority holds the row with its own identity and timestamps.
    let stored: Secret = serde_json::from_str(&sql.get(&key).await.unwrap()).unwrap();
    assert!(stored.id > 0);
    assert_eq!(stored.secret_id, key);
    assert_eq!(stored.user_id, secret.user_id);
    assert_eq!(stored.name, secret.name);
    assert_eq!(stored.secret_key, secret.secret_key);
    assert_eq!(stored.expires, secret.expires);
    assert_eq!(stored.status, secret.status);
    assert_eq!(stored.description, secret.description);
}

#[tokio::test]
async fn authority_hit_promotes_the_same_carrier_into_upper_tiers() {
    let local = Arc::new(MemoryStore::new());
    let remote = Arc::new(MemoryStore::new());
    let sql = sqlite_store().await;
    let cache = SecretCache::three_tier(local.clone(), remote.clone(), sql.clone()).unwrap();

    let key = test_key("secret_fallback");
    let secret = sample_secret(&key);
    sql.set(&key, &serde_json::to_string(&secret).unwrap())
        .await
        .unwrap();

    let found = cache.get(&key).await.unwrap();
    assert_eq!(found.secret_id, key);
    assert_eq!(found.secret_key, secret.secret_key);
    cache.wait().await;

    // Every upper tier now holds exactly the payload the authority produced.
    let authoritative = sql.get(&key).await.unwrap();
    assert_eq!(local.get(&key).await.unwrap(), authoritative);
    assert_eq!(remote.get(&key).await.unwrap(), authoritative);
}

#[tokio::test]
async fn secret_delete_reaches_the_authority() {
    let sql = sqlite_store().await;
    let cache = SecretCache::three_tier(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
        sql.clone(),
    )
    .unwrap();

    let key = test_key("secret_delete");
    cache.set(&key, &sample_secret(&key)).await.unwrap();
    cache.del(&key).await.unwrap();
    cache.wait().await;

    assert!(sql.get(&key).await.unwrap_err().is_not_found());
    assert!(cache.get(&key).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn sql_store_ignores_deadlines() {
    let sql = sqlite_store().await;
    let key = test_key("sql_ttl");
    let payload = serde_json::to_string(&sample_secret(&key)).unwrap();

    sql.set_with_ttl(&key, &payload, Duration::from_secs(1))
        .await
        .unwrap();

    let (found, ttl) = sql.get_with_ttl(&key).await.unwrap();
    assert!(ttl.is_none());
    let stored: Secret = serde_json::from_str(&found).unwrap();
    assert_eq!(stored.secret_id, key);
}

#[tokio::test]
async fn sql_upsert_keeps_row_identity() {
    let sql = sqlite_store().await;
    let key = test_key("sql_upsert");
    let mut secret = sample_secret(&key);

    sql.set(&key, &serde_json::to_string(&secret).unwrap())
        .await
        .unwrap();
    let first: Secret = serde_json::from_str(&sql.get(&key).await.unwrap()).unwrap();

    secret.description = "rotated".to_string();
    sql.set(&key, &serde_json::to_string(&secret).unwrap())
        .await
        .unwrap();
    let second: Secret = serde_json::from_str(&sql.get(&key).await.unwrap()).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.description, "rotated");
}

#[tokio::test]
async fn soft_deleted_row_is_revived_by_set() {
    let sql = sqlite_store().await;
    let key = test_key("sql_revive");
    let payload = serde_json::to_string(&sample_secret(&key)).unwrap();

    sql.set(&key, &payload).await.unwrap();
    sql.del(&key).await.unwrap();
    assert!(sql.get(&key).await.unwrap_err().is_not_found());

    sql.set(&key, &payload).await.unwrap();
    let revived: Secret = serde_json::from_str(&sql.get(&key).await.unwrap()).unwrap();
    assert_eq!(revived.secret_id, key);
}
