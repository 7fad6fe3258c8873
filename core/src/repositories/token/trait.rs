//! Token store trait: the blacklist of revoked access tokens and the
//! whitelist holding each user's current refresh token.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::DomainError;

/// Key-value store behind the token service
///
/// This is the only mutable state of the auth flow. Implementations must be
/// safe for concurrent use from many in-flight requests and must expire
/// entries on their own once their TTL elapses.
///
/// Every method fails with [`DomainError::Infrastructure`] when the backing
/// store cannot be reached or does not answer in time.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Check whether an access token signature has been revoked
    ///
    /// # Arguments
    /// * `signature` - Signature segment of the access token
    ///
    /// # Returns
    /// * `Ok(true)` - Token was revoked and its entry has not expired yet
    /// * `Ok(false)` - Token is not on the blacklist
    async fn is_blacklisted(&self, signature: &str) -> Result<bool, DomainError>;

    /// Revoke an access token until its own expiry
    ///
    /// Idempotent: blacklisting the same signature twice only refreshes the TTL.
    ///
    /// # Arguments
    /// * `signature` - Signature segment of the access token
    /// * `ttl` - Remaining lifetime of the token
    async fn blacklist(&self, signature: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Get the current refresh token of a user
    ///
    /// # Returns
    /// * `Ok(Some(token))` - The stored refresh token
    /// * `Ok(None)` - User never logged in, logged out, or the entry expired
    async fn get_refresh_token(&self, subject: &str) -> Result<Option<String>, DomainError>;

    /// Store a user's refresh token, overwriting any previous one
    ///
    /// # Example
    /// ```no_run
    /// # use std::time::Duration;
    /// # use auth_core::repositories::TokenStore;
    /// # async fn example(store: &impl TokenStore) -> Result<(), Box<dyn std::error::Error>> {
    /// store.put_refresh_token("42", "eyJ...", Duration::from_secs(14 * 86400)).await?;
    /// assert!(store.get_refresh_token("42").await?.is_some());
    /// # Ok(())
    /// # }
    /// ```
    async fn put_refresh_token(
        &self,
        subject: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<(), DomainError>;

    /// Atomically replace a user's refresh token if it still equals `expected`
    ///
    /// Replaying a swap that was already applied succeeds without writing, so
    /// callers may retry after a lost reply. Every `token` is unique, which
    /// keeps a competing rotation from matching.
    ///
    /// # Returns
    /// * `Ok(true)` - The stored value was `expected` and is now `token`, or
    ///   it already was `token`
    /// * `Ok(false)` - Another writer got there first; nothing was written
    async fn replace_refresh_token(
        &self,
        subject: &str,
        expected: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<bool, DomainError>;

    /// Remove a user's refresh token
    ///
    /// # Returns
    /// * `Ok(true)` - A token was removed
    /// * `Ok(false)` - There was nothing to remove
    async fn delete_refresh_token(&self, subject: &str) -> Result<bool, DomainError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
