//! # Auth Core
//!
//! Domain layer of the auth service: token entities, the JWT codec, the
//! token store port with an in-memory implementation, and the token service
//! that issues, authenticates, reissues and revokes tokens.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{Claims, ReissueOutcome, SignedToken, TokenKind, TokenPair};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{InMemoryTokenStore, TokenStore};
pub use services::{extract_bearer_token, TokenCodec, TokenService, TokenServiceConfig};
