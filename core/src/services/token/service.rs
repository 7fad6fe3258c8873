//! Main token service implementation

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::domain::entities::token::{SignedToken, TokenKind, TokenPair};
use crate::errors::{AuthError, DomainResult, TokenError};
use crate::repositories::TokenStore;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

const BEARER_PREFIX: &str = "Bearer ";

/// Issues, authenticates, reissues and revokes JWTs against a token store
///
/// Defaults to a trait object so the HTTP layer can hold any store behind
/// one concrete type; tests use the concrete in-memory store to inspect it.
pub struct TokenService<S: TokenStore + ?Sized = dyn TokenStore> {
    pub(crate) store: Arc<S>,
    pub(crate) codec: TokenCodec,
    pub(crate) config: TokenServiceConfig,
}

impl<S: TokenStore + ?Sized> TokenService<S> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `store` - Blacklist and refresh token store
    /// * `config` - Token service configuration
    pub fn new(store: Arc<S>, config: TokenServiceConfig) -> Self {
        let codec = TokenCodec::new(&config);
        Self { store, codec, config }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Issues a fresh token pair after a successful login
    ///
    /// The refresh token replaces whatever the user had stored before, so an
    /// older session can no longer reissue.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The access token and the persisted refresh token
    /// * `Err(DomainError::Infrastructure)` - The store could not be written
    pub async fn issue_tokens(
        &self,
        subject: &str,
        roles: &BTreeSet<String>,
    ) -> DomainResult<TokenPair> {
        let access_token =
            self.codec
                .issue(subject, roles, TokenKind::Access, self.config.access_token_ttl)?;
        let refresh_token = self.codec.issue(
            subject,
            &BTreeSet::new(),
            TokenKind::Refresh,
            self.config.refresh_token_ttl,
        )?;

        self.store
            .put_refresh_token(
                subject,
                &refresh_token.token,
                store_ttl(self.config.refresh_token_ttl),
            )
            .await?;

        info!(subject = %subject, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Authenticates a request by its `Authorization` header
    ///
    /// # Returns
    ///
    /// * `Ok(SignedToken)` - A valid, unrevoked access token
    /// * `Err(AuthError::NoAuthorizationHeader)` - Header missing or not a bearer token
    /// * `Err(AuthError::InvalidAccessToken)` - Revoked, tampered or unparseable token
    /// * `Err(AuthError::AccessTokenExpired)` - Authentic token past its expiry
    /// * `Err(AuthError::NotSupportedTokenType)` - A refresh token was presented
    pub async fn authenticate(&self, authorization: Option<&str>) -> DomainResult<SignedToken> {
        let token = extract_bearer_token(authorization)?;
        self.ensure_not_blacklisted(token).await?;

        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(TokenError::Expired) => return Err(AuthError::AccessTokenExpired.into()),
            Err(e) => {
                debug!(error = %e, "Rejected bearer token");
                return Err(AuthError::InvalidAccessToken.into());
            }
        };

        if claims.token_type != TokenKind::Access {
            warn!(subject = %claims.sub, "Refresh token presented as bearer token");
            return Err(AuthError::NotSupportedTokenType.into());
        }

        Ok(SignedToken {
            token: token.to_string(),
            claims,
        })
    }

    /// Revokes an access token and forgets the user's refresh token
    ///
    /// The blacklist entry lives as long as the token would have. Calling
    /// this twice for the same token is harmless.
    pub async fn logout(&self, access_token: &SignedToken) -> DomainResult<()> {
        let signature = TokenCodec::signature(&access_token.token)
            .map_err(|_| AuthError::InvalidAccessToken)?;
        let remaining = access_token.remaining(Utc::now());

        self.store.blacklist(signature, store_ttl(remaining)).await?;
        let removed = self
            .store
            .delete_refresh_token(&access_token.claims.sub)
            .await?;

        info!(
            subject = %access_token.claims.sub,
            refresh_token_removed = removed,
            "Logged out"
        );
        Ok(())
    }

    pub(crate) async fn ensure_not_blacklisted(&self, token: &str) -> DomainResult<()> {
        let signature = TokenCodec::signature(token).map_err(|_| AuthError::InvalidAccessToken)?;

        if self.store.is_blacklisted(signature).await? {
            warn!("Rejected blacklisted access token");
            return Err(AuthError::InvalidAccessToken.into());
        }
        Ok(())
    }
}

/// Extracts the token from a `Bearer <token>` header value
pub fn extract_bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    authorization
        .and_then(|header| header.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::NoAuthorizationHeader)
}

/// Store TTL for a token lifetime, never below one second
pub(crate) fn store_ttl(lifetime: Duration) -> std::time::Duration {
    lifetime
        .to_std()
        .unwrap_or_default()
        .max(std::time::Duration::from_secs(1))
}
