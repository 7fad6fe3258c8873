//! Token entities for JWT-based authentication.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Which half of the token pair a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived bearer token presented on every request
    Access,
    /// Long-lived token kept in an HttpOnly cookie, used only for reissue
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Role claims; always empty on refresh tokens
    #[serde(default)]
    pub roles: BTreeSet<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Access or refresh
    pub token_type: TokenKind,
}

impl Claims {
    /// Creates claims valid from `issued_at` until `expires_at`
    pub fn new(
        subject: impl Into<String>,
        roles: BTreeSet<String>,
        token_type: TokenKind,
        issuer: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: subject.into(),
            roles,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.into(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type,
        }
    }

    /// Lifetime left at `now`; zero during the second named by `exp`,
    /// negative once expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        Duration::seconds(self.exp - now.timestamp())
    }
}

/// An encoded JWT together with the claims it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    /// Compact JWT (`header.payload.signature`)
    pub token: String,

    /// Decoded claims
    pub claims: Claims,
}

impl SignedToken {
    /// Lifetime left at `now`
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.claims.remaining(now)
    }
}

/// Token pair handed out at login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Bearer access token
    pub access_token: SignedToken,

    /// Refresh token, also persisted as the subject's current one
    pub refresh_token: SignedToken,
}

/// Result of a successful reissue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReissueOutcome {
    /// Freshly minted access token
    pub access_token: SignedToken,

    /// Rotated refresh token, present only when the previous one was close
    /// to expiry
    pub refresh_token: Option<SignedToken>,
}

impl ReissueOutcome {
    /// Whether the refresh token was rotated as part of this reissue
    pub fn is_refresh_token_reissued(&self) -> bool {
        self.refresh_token.is_some()
    }
}
