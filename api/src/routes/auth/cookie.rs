//! Refresh token cookie construction

use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::{Cookie, CookieBuilder, SameSite};
use auth_core::domain::entities::token::SignedToken;
use auth_shared::config::CookieConfig;

fn same_site(value: &str) -> SameSite {
    match value.to_ascii_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}

fn base_cookie(config: &CookieConfig, value: String) -> CookieBuilder<'static> {
    Cookie::build(config.name.clone(), value)
        .path(config.path.clone())
        .http_only(config.http_only)
        .secure(config.secure)
        .same_site(same_site(&config.same_site))
}

/// Cookie carrying a freshly issued refresh token
///
/// `Max-Age` is the token's full lifetime and `Expires` its `exp` claim.
pub fn refresh_token_cookie(config: &CookieConfig, refresh_token: &SignedToken) -> Cookie<'static> {
    let claims = &refresh_token.claims;
    let mut builder =
        base_cookie(config, refresh_token.token.clone()).max_age(Duration::seconds(claims.exp - claims.iat));

    if let Ok(expires) = OffsetDateTime::from_unix_timestamp(claims.exp) {
        builder = builder.expires(expires);
    }
    builder.finish()
}

/// Cookie that makes the browser drop the refresh token
pub fn removal_cookie(config: &CookieConfig) -> Cookie<'static> {
    let mut cookie = base_cookie(config, String::new()).finish();
    cookie.make_removal();
    cookie
}
