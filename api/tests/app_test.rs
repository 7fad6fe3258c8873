//! Health check, fallback routes and store outages

mod common;

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use async_trait::async_trait;
use auth_api::create_app;
use auth_core::errors::DomainError;
use auth_core::repositories::TokenStore;
use serde_json::Value;

use common::{bearer, state_for, TestContext};

struct UnreachableStore;

fn unreachable() -> DomainError {
    DomainError::Infrastructure {
        message: "Cache operation 'GET' timed out".to_string(),
    }
}

#[async_trait]
impl TokenStore for UnreachableStore {
    async fn is_blacklisted(&self, _signature: &str) -> Result<bool, DomainError> {
        Err(unreachable())
    }

    async fn blacklist(&self, _signature: &str, _ttl: Duration) -> Result<(), DomainError> {
        Err(unreachable())
    }

    async fn get_refresh_token(&self, _subject: &str) -> Result<Option<String>, DomainError> {
        Err(unreachable())
    }

    async fn put_refresh_token(
        &self,
        _subject: &str,
        _token: &str,
        _ttl: Duration,
    ) -> Result<(), DomainError> {
        Err(unreachable())
    }

    async fn replace_refresh_token(
        &self,
        _subject: &str,
        _expected: &str,
        _token: &str,
        _ttl: Duration,
    ) -> Result<bool, DomainError> {
        Err(unreachable())
    }

    async fn delete_refresh_token(&self, _subject: &str) -> Result<bool, DomainError> {
        Err(unreachable())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Err(unreachable())
    }
}

#[actix_web::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "auth-api");
}

#[actix_web::test]
async fn test_health_check_reports_store_outage() {
    let app = test::init_service(create_app(state_for(Arc::new(UnreachableStore)))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
}

#[actix_web::test]
async fn test_reissue_during_store_outage_is_retriable() {
    let state = state_for(Arc::new(UnreachableStore));
    let app = test::init_service(create_app(state.clone())).await;
    let ctx = TestContext::new();
    let access = ctx.expired_access_token();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/reissue")
        .insert_header((header::AUTHORIZATION, bearer(&access.token)))
        .cookie(actix_web::cookie::Cookie::new("refreshToken", "value"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INFRASTRUCTURE_ERROR");
}

#[actix_web::test]
async fn test_unknown_route_returns_json_404() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/api/v1/users").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NOT_FOUND");
}
