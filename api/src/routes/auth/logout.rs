use actix_web::{web, HttpResponse};
use tracing::debug;

use crate::app::AppState;
use crate::dto::auth::LogoutResponse;
use crate::handlers::error::ApiError;
use crate::middleware::auth::AuthContext;

use super::cookie::removal_cookie;

/// Handler for POST /api/v1/auth/logout
///
/// Blacklists the presented access token for the rest of its lifetime,
/// forgets the user's refresh token and clears the cookie. Requires
/// authentication via Bearer token in Authorization header.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing Authorization header
/// - 401 Unauthorized: Invalid, revoked or expired access token
/// - 503 Service Unavailable: Token store unreachable
pub async fn logout(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    debug!(subject = %auth.subject, "Logout requested");
    state.token_service.logout(&auth.token).await?;

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&state.cookie))
        .json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }))
}
