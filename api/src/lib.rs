//! # Auth API
//!
//! HTTP boundary of the auth service: the token reissue and logout routes,
//! the bearer authentication middleware and the mapping of domain errors to
//! JSON error responses.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
