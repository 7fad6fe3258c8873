//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - JWT encoding and verification (`codec`)
//! - Token pair issuance, bearer authentication and logout (`service`)
//! - Access token reissue with refresh token rotation (`reissue`)

mod codec;
mod config;
mod reissue;
mod service;


pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use service::{extract_bearer_token, TokenService};
