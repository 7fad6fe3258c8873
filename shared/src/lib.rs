//! Shared configuration and response types for the auth service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and the layered configuration loader
//! - The JSON error body and its stable error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, CookieConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
