//! Unit tests for the in-memory token store

use std::sync::Arc;
use std::time::Duration;

use crate::repositories::token::{InMemoryTokenStore, TokenStore};

const DAY: Duration = Duration::from_secs(86400);

#[tokio::test]
async fn test_put_and_get_refresh_token() {
    let store = InMemoryTokenStore::new();

    store.put_refresh_token("42", "refresh-1", DAY).await.unwrap();

    let found = store.get_refresh_token("42").await.unwrap();
    assert_eq!(found, Some("refresh-1".to_string()));
    assert_eq!(store.get_refresh_token("43").await.unwrap(), None);
}

#[tokio::test]
async fn test_put_overwrites_previous_refresh_token() {
    let store = InMemoryTokenStore::new();

    store.put_refresh_token("42", "refresh-1", DAY).await.unwrap();
    store.put_refresh_token("42", "refresh-2", DAY).await.unwrap();

    assert_eq!(
        store.get_refresh_token("42").await.unwrap(),
        Some("refresh-2".to_string())
    );
    assert_eq!(store.refresh_token_count().await, 1);
}

#[tokio::test]
async fn test_expired_refresh_token_is_absent() {
    let store = InMemoryTokenStore::new();

    store
        .put_refresh_token("42", "refresh-1", Duration::from_millis(20))
        .await
        .unwrap();
    std::thread::sleep(Duration::from_millis(40));

    assert_eq!(store.get_refresh_token("42").await.unwrap(), None);
    assert_eq!(store.refresh_token_count().await, 0);
}

#[tokio::test]
async fn test_replace_succeeds_only_on_expected_value() {
    let store = InMemoryTokenStore::new();
    store.put_refresh_token("42", "refresh-1", DAY).await.unwrap();

    let stale = store
        .replace_refresh_token("42", "refresh-0", "refresh-x", DAY)
        .await
        .unwrap();
    assert!(!stale);
    assert_eq!(
        store.get_refresh_token("42").await.unwrap(),
        Some("refresh-1".to_string())
    );

    let swapped = store
        .replace_refresh_token("42", "refresh-1", "refresh-2", DAY)
        .await
        .unwrap();
    assert!(swapped);
    assert_eq!(
        store.get_refresh_token("42").await.unwrap(),
        Some("refresh-2".to_string())
    );
}

#[tokio::test]
async fn test_replaying_applied_replace_reports_success() {
    let store = InMemoryTokenStore::new();
    store.put_refresh_token("42", "refresh-1", DAY).await.unwrap();

    assert!(store
        .replace_refresh_token("42", "refresh-1", "refresh-2", DAY)
        .await
        .unwrap());
    assert!(store
        .replace_refresh_token("42", "refresh-1", "refresh-2", DAY)
        .await
        .unwrap());
    assert_eq!(
        store.get_refresh_token("42").await.unwrap(),
        Some("refresh-2".to_string())
    );

    // A different rotation from the same starting point still loses
    assert!(!store
        .replace_refresh_token("42", "refresh-1", "refresh-3", DAY)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_replace_on_missing_subject_writes_nothing() {
    let store = InMemoryTokenStore::new();

    let swapped = store
        .replace_refresh_token("42", "refresh-1", "refresh-2", DAY)
        .await
        .unwrap();

    assert!(!swapped);
    assert_eq!(store.get_refresh_token("42").await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_replace_has_single_winner() {
    let store = Arc::new(InMemoryTokenStore::new());
    store.put_refresh_token("42", "refresh-1", DAY).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .replace_refresh_token("42", "refresh-1", &format!("rotated-{}", i), DAY)
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    let current = store.get_refresh_token("42").await.unwrap().unwrap();
    assert!(current.starts_with("rotated-"));
}

#[tokio::test]
async fn test_delete_refresh_token() {
    let store = InMemoryTokenStore::new();
    store.put_refresh_token("42", "refresh-1", DAY).await.unwrap();

    assert!(store.delete_refresh_token("42").await.unwrap());
    assert!(!store.delete_refresh_token("42").await.unwrap());
    assert_eq!(store.get_refresh_token("42").await.unwrap(), None);
}

#[tokio::test]
async fn test_blacklist_is_idempotent_and_expires() {
    let store = InMemoryTokenStore::new();

    assert!(!store.is_blacklisted("sig").await.unwrap());

    store.blacklist("sig", Duration::from_millis(30)).await.unwrap();
    store.blacklist("sig", Duration::from_millis(30)).await.unwrap();
    assert!(store.is_blacklisted("sig").await.unwrap());
    assert_eq!(store.blacklist_len().await, 1);

    std::thread::sleep(Duration::from_millis(50));
    assert!(!store.is_blacklisted("sig").await.unwrap());
    assert_eq!(store.blacklist_len().await, 0);
}

#[tokio::test]
async fn test_ping_defaults_to_ok() {
    let store = InMemoryTokenStore::new();
    assert!(store.ping().await.is_ok());
}
