//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The token store could not be reached or timed out
    #[error("Infrastructure error: {message}")]
    Infrastructure { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Whether the caller may retry the request with backoff
    pub fn is_retriable(&self) -> bool {
        matches!(self, DomainError::Infrastructure { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
