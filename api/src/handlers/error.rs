//! Translation of domain errors into HTTP responses
//!
//! Every failure leaves the service through [`error_status_and_body`], so the
//! status code and the `code` field of the JSON body stay in lockstep.

use std::fmt;

use actix_web::http::header::{self, CacheControl, CacheDirective};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use auth_core::errors::{AuthError, DomainError};
use auth_shared::errors::{error_codes, ErrorResponse};
use tracing::{debug, error};

/// Seconds a client should wait before retrying after a store outage
const RETRY_AFTER_SECS: &str = "1";

/// Map a domain error to its HTTP status and JSON body
pub fn error_status_and_body(error: &DomainError) -> (StatusCode, ErrorResponse) {
    let (status, code) = match error {
        DomainError::Auth(AuthError::NoAuthorizationHeader) => {
            (StatusCode::BAD_REQUEST, error_codes::NO_AUTHORIZATION_HEADER)
        }
        DomainError::Auth(AuthError::NotSupportedTokenType) => {
            (StatusCode::BAD_REQUEST, error_codes::NOT_SUPPORTED_TOKEN_TYPE)
        }
        DomainError::Auth(AuthError::InvalidAccessToken) => {
            (StatusCode::UNAUTHORIZED, error_codes::INVALID_ACCESS_TOKEN)
        }
        DomainError::Auth(AuthError::AccessTokenExpired) => {
            (StatusCode::UNAUTHORIZED, error_codes::ACCESS_TOKEN_EXPIRED)
        }
        DomainError::Auth(AuthError::AccessTokenNotExpired) => {
            (StatusCode::BAD_REQUEST, error_codes::ACCESS_TOKEN_NOT_EXPIRED)
        }
        DomainError::Auth(AuthError::NoRefreshToken) => {
            (StatusCode::BAD_REQUEST, error_codes::NO_REFRESH_TOKEN)
        }
        DomainError::Auth(AuthError::InvalidRefreshToken) => {
            (StatusCode::UNAUTHORIZED, error_codes::INVALID_REFRESH_TOKEN)
        }
        DomainError::Infrastructure { .. } => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new(
                    error_codes::INFRASTRUCTURE_ERROR,
                    "Token store is temporarily unavailable, please retry",
                ),
            );
        }
        DomainError::Token(_) | DomainError::Internal { .. } => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred"),
            );
        }
    };

    (status, ErrorResponse::new(code, error.to_string()))
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let (status, body) = error_status_and_body(error);

    if status.is_server_error() {
        error!(error = %error, code = %body.code, "Request failed");
    } else {
        debug!(code = %body.code, "Request rejected");
    }

    let mut response = HttpResponse::build(status);
    response.insert_header(CacheControl(vec![CacheDirective::NoStore]));
    if error.is_retriable() {
        response.insert_header((header::RETRY_AFTER, RETRY_AFTER_SECS));
    }
    response.json(body)
}

/// Domain error carried through actix handlers and middleware
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        error_status_and_body(&self.0).0
    }

    fn error_response(&self) -> HttpResponse {
        handle_domain_error(&self.0)
    }
}
