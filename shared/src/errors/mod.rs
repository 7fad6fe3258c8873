//! Shared error response structure

use serde::{Deserialize, Serialize};

/// Error body returned by every endpoint
///
/// `code` is stable and meant for client branching (for example a client
/// sends the user back to login on `INVALID_REFRESH_TOKEN`), `message` is
/// human readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Error codes used across the service
pub mod error_codes {
    pub const NO_AUTHORIZATION_HEADER: &str = "NO_AUTHORIZATION_HEADER";
    pub const NOT_SUPPORTED_TOKEN_TYPE: &str = "NOT_SUPPORTED_TOKEN_TYPE";
    pub const INVALID_ACCESS_TOKEN: &str = "INVALID_ACCESS_TOKEN";
    pub const ACCESS_TOKEN_EXPIRED: &str = "ACCESS_TOKEN_EXPIRED";
    pub const ACCESS_TOKEN_NOT_EXPIRED: &str = "ACCESS_TOKEN_NOT_EXPIRED";
    pub const NO_REFRESH_TOKEN: &str = "NO_REFRESH_TOKEN";
    pub const INVALID_REFRESH_TOKEN: &str = "INVALID_REFRESH_TOKEN";
    pub const INFRASTRUCTURE_ERROR: &str = "INFRASTRUCTURE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serializes_code_and_message() {
        let response = ErrorResponse::new(error_codes::NO_REFRESH_TOKEN, "Refresh token is missing");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["code"], "NO_REFRESH_TOKEN");
        assert_eq!(json["message"], "Refresh token is missing");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
