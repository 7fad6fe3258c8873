//! Redis-backed token store
//!
//! Key layout (under the optional `cache.key_prefix`):
//! - `blacklist:{signature}` - revoked access token, expires with the token
//! - `refresh:{subject}` - the user's current refresh token

use std::time::Duration;

use async_trait::async_trait;
use auth_core::errors::DomainError;
use auth_core::repositories::TokenStore;
use tracing::warn;

use super::redis_client::RedisClient;

const BLACKLIST_PREFIX: &str = "blacklist";
const REFRESH_TOKEN_PREFIX: &str = "refresh";
const BLACKLIST_MARKER: &str = "1";

/// [`TokenStore`] over a shared [`RedisClient`]
#[derive(Clone)]
pub struct RedisTokenStore {
    client: RedisClient,
}

impl RedisTokenStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn blacklist_key(&self, signature: &str) -> String {
        self.client.config().make_key(&blacklist_key(signature))
    }

    fn refresh_key(&self, subject: &str) -> String {
        self.client.config().make_key(&refresh_key(subject))
    }
}

pub(crate) fn blacklist_key(signature: &str) -> String {
    format!("{}:{}", BLACKLIST_PREFIX, signature)
}

pub(crate) fn refresh_key(subject: &str) -> String {
    format!("{}:{}", REFRESH_TOKEN_PREFIX, subject)
}

/// Redis TTLs are whole seconds and must be positive
pub(crate) fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn is_blacklisted(&self, signature: &str) -> Result<bool, DomainError> {
        Ok(self.client.exists(&self.blacklist_key(signature)).await?)
    }

    async fn blacklist(&self, signature: &str, ttl: Duration) -> Result<(), DomainError> {
        self.client
            .set_with_expiry(&self.blacklist_key(signature), BLACKLIST_MARKER, ttl_seconds(ttl))
            .await?;
        Ok(())
    }

    async fn get_refresh_token(&self, subject: &str) -> Result<Option<String>, DomainError> {
        Ok(self.client.get(&self.refresh_key(subject)).await?)
    }

    async fn put_refresh_token(
        &self,
        subject: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        self.client
            .set_with_expiry(&self.refresh_key(subject), token, ttl_seconds(ttl))
            .await?;
        Ok(())
    }

    async fn replace_refresh_token(
        &self,
        subject: &str,
        expected: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<bool, DomainError> {
        Ok(self
            .client
            .compare_and_swap(&self.refresh_key(subject), expected, token, ttl_seconds(ttl))
            .await?)
    }

    async fn delete_refresh_token(&self, subject: &str) -> Result<bool, DomainError> {
        Ok(self.client.delete(&self.refresh_key(subject)).await?)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        if self.client.health_check().await? {
            Ok(())
        } else {
            warn!("Redis answered PING with an unexpected reply");
            Err(DomainError::Infrastructure {
                message: "Unexpected PING reply".to_string(),
            })
        }
    }
}
