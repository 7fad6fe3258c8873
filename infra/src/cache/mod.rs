//! Cache module for Redis-based token storage
//!
//! This module provides the Redis client (connection retry, per-operation
//! timeout, retry with backoff) and the token store built on it.

pub mod redis_client;
pub mod token_store;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use token_store::RedisTokenStore;

// Re-export commonly used types
pub use auth_shared::config::CacheConfig;
