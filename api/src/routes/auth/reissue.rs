use actix_web::{http::header::AUTHORIZATION, web, HttpRequest, HttpResponse};

use crate::app::AppState;
use crate::dto::auth::ReissueResponse;
use crate::handlers::error::ApiError;

use super::cookie::refresh_token_cookie;

/// Handler for POST /api/v1/auth/reissue
///
/// Trades an expired access token plus the refresh token cookie for a new
/// access token. When the refresh token is close to expiry it is rotated and
/// the new one is set as a cookie.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {expired_access_token}
/// Cookie: refreshToken={refresh_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "accessToken": "eyJ...",
///     "isRefreshTokenReissued": false
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing header or cookie, access token not expired yet
/// - 401 Unauthorized: Invalid or revoked access token, invalid refresh token
/// - 503 Service Unavailable: Token store unreachable
pub async fn reissue(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let refresh_cookie = req.cookie(&state.cookie.name);

    let outcome = state
        .token_service
        .reissue(authorization, refresh_cookie.as_ref().map(|cookie| cookie.value()))
        .await?;

    let mut response = HttpResponse::Ok();
    if let Some(refresh_token) = &outcome.refresh_token {
        response.cookie(refresh_token_cookie(&state.cookie, refresh_token));
    }

    Ok(response.json(ReissueResponse {
        is_refresh_token_reissued: outcome.is_refresh_token_reissued(),
        access_token: outcome.access_token.token,
    }))
}
