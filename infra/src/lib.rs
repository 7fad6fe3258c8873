//! # Infrastructure Layer
//!
//! Concrete adapters behind the ports defined in `auth_core`:
//!
//! - **Cache**: Redis client with connection retry, per-operation timeouts
//!   and exponential backoff
//! - **Token store**: Redis implementation of [`auth_core::repositories::TokenStore`]

use auth_core::errors::DomainError;

/// Cache module - Redis client and the Redis-backed token store
pub mod cache;

pub use cache::{RedisClient, RedisTokenStore};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Redis did not answer within the configured response timeout
    #[error("Cache operation '{operation}' timed out")]
    Timeout { operation: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::Infrastructure {
            message: error.to_string(),
        }
    }
}
