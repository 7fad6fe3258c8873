//! Access token reissue with proximity-based refresh token rotation

use std::collections::BTreeSet;

use chrono::Utc;
use constant_time_eq::constant_time_eq;
use tracing::{debug, info, warn};

use crate::domain::entities::token::{Claims, ReissueOutcome, TokenKind};
use crate::errors::{AuthError, DomainResult, TokenError};
use crate::repositories::TokenStore;

use super::service::{extract_bearer_token, store_ttl, TokenService};

impl<S: TokenStore + ?Sized> TokenService<S> {
    /// Trades an expired access token and the matching refresh token cookie
    /// for a new access token
    ///
    /// Checks run in a fixed order and the first failure is returned. The
    /// store is only written when the refresh token is rotated, which
    /// happens once its remaining lifetime drops below the configured
    /// threshold.
    ///
    /// # Arguments
    ///
    /// * `authorization` - Raw `Authorization` header value
    /// * `refresh_cookie` - Value of the refresh token cookie
    ///
    /// # Returns
    ///
    /// * `Ok(ReissueOutcome)` - New access token, plus a new refresh token if rotated
    /// * `Err(AuthError::AccessTokenNotExpired)` - The access token is still valid
    /// * `Err(AuthError::InvalidRefreshToken)` - Cookie does not match the store,
    ///   the stored token is invalid, or a concurrent reissue already rotated it
    /// * `Err(DomainError::Infrastructure)` - The store failed or timed out
    pub async fn reissue(
        &self,
        authorization: Option<&str>,
        refresh_cookie: Option<&str>,
    ) -> DomainResult<ReissueOutcome> {
        let access_token = extract_bearer_token(authorization)?;
        self.ensure_not_blacklisted(access_token).await?;
        let access_claims = self.expired_access_claims(access_token)?;
        let subject = access_claims.sub.as_str();

        let cookie = refresh_cookie
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::NoRefreshToken)?;

        let stored = self
            .store
            .get_refresh_token(subject)
            .await?
            .ok_or(AuthError::NoRefreshToken)?;

        if !constant_time_eq(stored.as_bytes(), cookie.as_bytes()) {
            warn!(subject = %subject, "Refresh token cookie does not match the stored token");
            return Err(AuthError::InvalidRefreshToken.into());
        }

        let refresh_claims = self.verified_refresh_claims(&stored, subject)?;

        let now = Utc::now();
        let access = self.codec.issue(
            subject,
            &access_claims.roles,
            TokenKind::Access,
            self.config.access_token_ttl,
        )?;

        if refresh_claims.remaining(now) >= self.config.reissue_threshold {
            info!(subject = %subject, "Reissued access token");
            return Ok(ReissueOutcome {
                access_token: access,
                refresh_token: None,
            });
        }

        let rotated = self.codec.issue(
            subject,
            &BTreeSet::new(),
            TokenKind::Refresh,
            self.config.refresh_token_ttl,
        )?;
        let swapped = self
            .store
            .replace_refresh_token(
                subject,
                &stored,
                &rotated.token,
                store_ttl(self.config.refresh_token_ttl),
            )
            .await?;

        if !swapped {
            warn!(subject = %subject, "Refresh token was rotated by a concurrent reissue");
            return Err(AuthError::InvalidRefreshToken.into());
        }

        info!(subject = %subject, "Reissued access token and rotated refresh token");
        Ok(ReissueOutcome {
            access_token: access,
            refresh_token: Some(rotated),
        })
    }

    /// Claims of an access token that is authentic but expired
    fn expired_access_claims(&self, token: &str) -> DomainResult<Claims> {
        let (claims, expired) = match self.codec.verify(token) {
            Ok(claims) => (claims, false),
            Err(TokenError::Expired) => {
                let claims = self
                    .codec
                    .decode_expired(token)
                    .map_err(|_| AuthError::InvalidAccessToken)?;
                (claims, true)
            }
            Err(e) => {
                debug!(error = %e, "Rejected access token on reissue");
                return Err(AuthError::InvalidAccessToken.into());
            }
        };

        if claims.token_type != TokenKind::Access {
            return Err(AuthError::NotSupportedTokenType.into());
        }
        if !expired {
            return Err(AuthError::AccessTokenNotExpired.into());
        }
        Ok(claims)
    }

    /// Claims of the stored refresh token, which must be valid, unexpired and
    /// belong to `subject`
    fn verified_refresh_claims(&self, token: &str, subject: &str) -> DomainResult<Claims> {
        let claims = self.codec.verify(token).map_err(|e| {
            debug!(error = %e, subject = %subject, "Stored refresh token failed verification");
            AuthError::InvalidRefreshToken
        })?;

        if claims.token_type != TokenKind::Refresh || claims.sub != subject {
            return Err(AuthError::InvalidRefreshToken.into());
        }
        Ok(claims)
    }
}
