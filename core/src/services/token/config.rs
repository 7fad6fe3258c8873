//! Configuration for the token service

use std::str::FromStr;

use auth_shared::config::{JwtConfig, DEFAULT_JWT_SECRET, MAX_TOKEN_EXPIRY_SECONDS};
use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::errors::DomainError;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Value of the `iss` claim, also required on verification
    pub issuer: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// Refresh tokens with less remaining lifetime are rotated on reissue
    pub reissue_threshold: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
            issuer: "course-auth".to_string(),
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(14),
            reissue_threshold: Duration::days(7),
        }
    }
}

impl TokenServiceConfig {
    /// Build the service configuration from the JWT section of the app config
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| DomainError::Internal {
            message: format!("Unknown JWT algorithm: {}", config.algorithm),
        })?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(DomainError::Internal {
                message: format!("JWT algorithm {} is not a shared-secret algorithm", config.algorithm),
            });
        }

        Ok(Self {
            jwt_secret: config.secret.clone(),
            algorithm,
            issuer: config.issuer.clone(),
            access_token_ttl: lifetime("access_token_expiry", config.access_token_expiry)?,
            refresh_token_ttl: lifetime("refresh_token_expiry", config.refresh_token_expiry)?,
            reissue_threshold: lifetime("reissue_threshold", config.reissue_threshold)?,
        })
    }
}

fn lifetime(name: &str, seconds: i64) -> Result<Duration, DomainError> {
    (0..=MAX_TOKEN_EXPIRY_SECONDS)
        .contains(&seconds)
        .then(|| Duration::try_seconds(seconds))
        .flatten()
        .ok_or_else(|| DomainError::Internal {
            message: format!("auth.jwt.{} out of range: {}", name, seconds),
        })
}
