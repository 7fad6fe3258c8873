//! JWT codec: signs and verifies access and refresh tokens

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{Claims, SignedToken, TokenKind};
use crate::errors::TokenError;

use super::config::TokenServiceConfig;

/// Encodes and verifies HMAC-signed JWTs
///
/// Expiry is checked with zero leeway, so a token is expired as soon as the
/// clock passes `exp`.
pub struct TokenCodec {
    issuer: String,
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expired_validation: Validation,
}

impl TokenCodec {
    /// Creates a codec from the service configuration
    pub fn new(config: &TokenServiceConfig) -> Self {
        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;
        validation.validate_exp = true;

        let mut expired_validation = validation.clone();
        expired_validation.validate_exp = false;

        Self {
            issuer: config.issuer.clone(),
            header: Header::new(config.algorithm),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            expired_validation,
        }
    }

    /// Issues a token valid from now for `ttl`
    pub fn issue(
        &self,
        subject: &str,
        roles: &BTreeSet<String>,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<SignedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::GenerationFailed)?;
        self.issue_at(subject, roles, kind, now, expires_at)
    }

    /// Issues a token with explicit issue and expiry instants
    pub fn issue_at(
        &self,
        subject: &str,
        roles: &BTreeSet<String>,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let roles = match kind {
            TokenKind::Access => roles.clone(),
            TokenKind::Refresh => BTreeSet::new(),
        };
        let claims = Claims::new(subject, roles, kind, self.issuer.as_str(), issued_at, expires_at);

        let token = encode(&self.header, &claims, &self.encoding_key)
            .map_err(|_| TokenError::GenerationFailed)?;

        Ok(SignedToken { token, claims })
    }

    /// Verifies signature, issuer and expiry
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Token is authentic and not expired
    /// * `Err(TokenError::Expired)` - Token is authentic but past `exp`
    /// * `Err(TokenError::InvalidSignature)` - Token was tampered with or signed with another key
    /// * `Err(TokenError::Malformed)` - Token cannot be parsed
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| map_jwt_error(e.kind()))
    }

    /// Decodes a token whose only defect is its expiry
    ///
    /// The signature and issuer are still verified.
    pub fn decode_expired(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.expired_validation)
            .map(|data| data.claims)
            .map_err(|e| map_jwt_error(e.kind()))
    }

    /// Signature segment of a compact JWT, used as the blacklist key
    pub fn signature(token: &str) -> Result<&str, TokenError> {
        let mut segments = token.split('.');
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(header), Some(payload), Some(signature), None)
                if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
            {
                Ok(signature)
            }
            _ => Err(TokenError::Malformed),
        }
    }
}

fn map_jwt_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            TokenError::Malformed
        }
        _ => TokenError::InvalidClaims,
    }
}
