//! Application state and factory
//!
//! This module holds the shared application state and builds the Actix-web
//! application used by both the binary and the integration tests.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header::{CacheControl, CacheDirective},
    middleware::DefaultHeaders,
    web, App, Error, HttpResponse,
};
use auth_core::services::TokenService;
use auth_shared::config::CookieConfig;
use auth_shared::errors::{error_codes, ErrorResponse};
use tracing::warn;
use tracing_actix_web::TracingLogger;

use crate::dto::auth::HealthResponse;
use crate::middleware::auth::JwtAuth;
use crate::routes::auth::{logout, reissue};

const SERVICE_NAME: &str = "auth-api";

/// State shared by all workers
pub struct AppState {
    pub token_service: TokenService,
    pub cookie: CookieConfig,
}

impl AppState {
    pub fn new(token_service: TokenService, cookie: CookieConfig) -> Self {
        Self {
            token_service,
            cookie,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .wrap(DefaultHeaders::new().add(CacheControl(vec![CacheDirective::NoStore])))
                    .route("/reissue", web::post().to(reissue))
                    .service(
                        web::resource("/logout")
                            .wrap(JwtAuth::new())
                            .route(web::post().to(logout)),
                    ),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
///
/// Reports unhealthy (503) when the token store does not answer.
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = match state.token_service.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Health check failed");
            false
        }
    };

    let body = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
