pub mod auth;

pub use auth::{HealthResponse, LogoutResponse, ReissueResponse};
