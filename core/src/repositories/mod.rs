//! Repository interfaces for token persistence.

pub mod token;

pub use token::{InMemoryTokenStore, TokenStore};
