//! Error types for bearer authentication, token reissue and the token codec
//!
//! Messages are English only; the API layer maps every variant to an HTTP
//! status and a stable error code.

use thiserror::Error;

/// Failures of the authentication and reissue protocol
///
/// All variants are terminal for the request: they describe bad client input
/// or a state mismatch and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header is missing or is not a Bearer token")]
    NoAuthorizationHeader,

    #[error("Token type is not supported here")]
    NotSupportedTokenType,

    #[error("Invalid access token")]
    InvalidAccessToken,

    #[error("Access token expired")]
    AccessTokenExpired,

    #[error("Access token has not expired yet")]
    AccessTokenNotExpired,

    #[error("Refresh token is missing")]
    NoRefreshToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,
}

/// Token codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Malformed token")]
    Malformed,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token generation failed")]
    GenerationFailed,
}
