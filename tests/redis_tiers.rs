//! Chains over a live Redis server.
//!
//! These tests need a reachable server (`REDIS_URL`, default
//! `redis://127.0.0.1:6379`); run them with `cargo test -- --ignored`.

use chain_cache::{Blob, Cache, MemoryStore, MokaStore, NamespacedCache, RedisStore, Store};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{chain_over, test_key};

#[tokio::test]
#[ignore = "requires a running redis server"]
async fn redis_backed_chain_round_trip() {
    let local = Arc::new(MemoryStore::new());
    let remote = Arc::new(RedisStore::new().await.unwrap());
    let chain = chain_over(vec![local.clone(), remote.clone()]);

    let key = test_key("redis_chain");
    chain
        .set_with_ttl(&key, "v", Duration::from_secs(60))
        .await
        .unwrap();
    chain.wait().await;

    assert_eq!(remote.get(&key).await.unwrap(), "v");
    assert_eq!(chain.get(&key).await.unwrap(), "v");

    chain.del(&key).await.unwrap();
    assert!(remote.get(&key).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires a running redis server"]
async fn redis_reports_remaining_ttl_for_promotion() {
    let local = Arc::new(MemoryStore::new());
    let remote = Arc::new(RedisStore::new().await.unwrap());
    let chain = chain_over(vec![local.clone(), remote.clone()]);

    let key = test_key("redis_ttl");
    remote
        .set_with_ttl(&key, "v", Duration::from_secs(60))
        .await
        .unwrap();

    let (value, ttl) = chain.get_with_ttl(&key).await.unwrap();
    assert_eq!(value, "v");
    assert!(ttl.is_some());

    chain.wait().await;
    let (_, local_ttl) = local.get_with_ttl(&key).await.unwrap();
    assert!(local_ttl.is_some());

    chain.del(&key).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running redis server"]
async fn production_stack_namespaced_adapter() {
    let local = Arc::new(MokaStore::default());
    let remote = Arc::new(RedisStore::new().await.unwrap());
    let cache = NamespacedCache::two_tier(local, remote).unwrap();

    let key = test_key("blob");
    let blob = Blob::new("example.com/Greeting", b"hello".to_vec());
    cache
        .set("itest", &key, &blob, Some(Duration::from_secs(60)))
        .await
        .unwrap();
    cache.wait().await;

    let (found, ttl) = cache.get("itest", &key).await.unwrap();
    assert_eq!(found, blob);
    assert!(ttl.is_some());

    cache.del("itest", &key).await.unwrap();
    assert!(cache.get("itest", &key).await.unwrap_err().is_not_found());
}
