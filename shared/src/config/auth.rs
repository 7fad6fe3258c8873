//! Authentication configuration

use serde::{Deserialize, Serialize};

/// Secret shipped in defaults; must be overridden outside development
pub const DEFAULT_JWT_SECRET: &str = "development-secret-please-change-in-production";

/// Longest accepted token lifetime or reissue threshold, in seconds (ten years)
pub const MAX_TOKEN_EXPIRY_SECONDS: i64 = 10 * 365 * 86_400;

/// JWT signing and lifetime configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Shared secret for HMAC signing
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    /// A refresh token with less remaining lifetime than this (seconds)
    /// is rotated during reissue
    pub reissue_threshold: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// Algorithm for JWT signing (HS256, HS384 or HS512)
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            access_token_expiry: 900,        // 15 minutes
            refresh_token_expiry: 1_209_600, // 14 days
            reissue_threshold: 604_800,      // 7 days
            issuer: String::from("course-auth"),
            algorithm: String::from("HS256"),
        }
    }
}

impl JwtConfig {
    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// Attributes of the refresh token cookie
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Cookie name
    pub name: String,

    /// Cookie path
    pub path: String,

    /// HttpOnly flag
    pub http_only: bool,

    /// Secure flag (HTTPS only)
    pub secure: bool,

    /// SameSite attribute ("Strict", "Lax" or "None")
    pub same_site: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: String::from("refreshToken"),
            path: String::from("/"),
            http_only: true,
            secure: false, // Set to true in production
            same_site: String::from("Lax"),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Refresh token cookie configuration
    pub cookie: CookieConfig,
}
