//! Authentication route handlers
//!
//! - `POST /api/v1/auth/reissue` - trade an expired access token for a new one
//! - `POST /api/v1/auth/logout` - revoke the caller's tokens

pub mod cookie;
pub mod logout;
pub mod reissue;

pub use logout::logout;
pub use reissue::reissue;
