//! In-memory token store for tests and single-process development

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::DomainError;

use super::r#trait::TokenStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Token store backed by two maps
///
/// Expired entries are invisible to readers and are dropped on the next
/// write to the same map.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    blacklist: RwLock<HashMap<String, Instant>>,
    refresh_tokens: RwLock<HashMap<String, Entry>>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live refresh tokens
    pub async fn refresh_token_count(&self) -> usize {
        let now = Instant::now();
        let tokens = self.refresh_tokens.read().await;
        tokens.values().filter(|entry| entry.is_live(now)).count()
    }

    /// Number of live blacklist entries
    pub async fn blacklist_len(&self) -> usize {
        let now = Instant::now();
        let blacklist = self.blacklist.read().await;
        blacklist.values().filter(|expires_at| now < **expires_at).count()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn is_blacklisted(&self, signature: &str) -> Result<bool, DomainError> {
        let blacklist = self.blacklist.read().await;
        Ok(blacklist
            .get(signature)
            .is_some_and(|expires_at| Instant::now() < *expires_at))
    }

    async fn blacklist(&self, signature: &str, ttl: Duration) -> Result<(), DomainError> {
        let now = Instant::now();
        let mut blacklist = self.blacklist.write().await;
        blacklist.retain(|_, expires_at| now < *expires_at);
        blacklist.insert(signature.to_string(), now + ttl);
        Ok(())
    }

    async fn get_refresh_token(&self, subject: &str) -> Result<Option<String>, DomainError> {
        let tokens = self.refresh_tokens.read().await;
        Ok(tokens
            .get(subject)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.value.clone()))
    }

    async fn put_refresh_token(
        &self,
        subject: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let now = Instant::now();
        let mut tokens = self.refresh_tokens.write().await;
        tokens.retain(|_, entry| entry.is_live(now));
        tokens.insert(subject.to_string(), Entry::new(token, ttl));
        Ok(())
    }

    async fn replace_refresh_token(
        &self,
        subject: &str,
        expected: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<bool, DomainError> {
        let now = Instant::now();
        let mut tokens = self.refresh_tokens.write().await;

        let current = tokens
            .get(subject)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.as_str());
        match current {
            Some(current) if current == expected => {}
            Some(current) if current == token => return Ok(true),
            _ => return Ok(false),
        }

        tokens.insert(subject.to_string(), Entry::new(token, ttl));
        Ok(true)
    }

    async fn delete_refresh_token(&self, subject: &str) -> Result<bool, DomainError> {
        let now = Instant::now();
        let mut tokens = self.refresh_tokens.write().await;
        Ok(tokens
            .remove(subject)
            .is_some_and(|entry| entry.is_live(now)))
    }
}
