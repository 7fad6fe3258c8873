pub mod error;

pub use error::{error_status_and_body, handle_domain_error, ApiError};
