//! Integration tests for the reissue endpoint

mod common;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::test;
use auth_api::create_app;
use auth_core::domain::entities::token::TokenKind;
use auth_core::repositories::TokenStore;
use auth_core::services::TokenCodec;
use chrono::Duration;
use serde_json::Value;

use common::{bearer, TestContext, SUBJECT};

const REISSUE: &str = "/api/v1/auth/reissue";

fn reissue_request(authorization: Option<&str>, refresh_token: Option<&str>) -> test::TestRequest {
    let mut req = test::TestRequest::post().uri(REISSUE);
    if let Some(authorization) = authorization {
        req = req.insert_header((header::AUTHORIZATION, authorization.to_string()));
    }
    if let Some(refresh_token) = refresh_token {
        req = req.cookie(Cookie::new("refreshToken", refresh_token.to_string()));
    }
    req
}

#[actix_web::test]
async fn test_reissue_success_without_rotation() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let refresh = ctx.stored_refresh_token(Duration::days(14)).await;
    let access = ctx.expired_access_token();

    let req = reissue_request(Some(&bearer(&access.token)), Some(&refresh.token)).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
    assert_eq!(resp.response().cookies().count(), 0);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["isRefreshTokenReissued"], false);
    let new_access = body["accessToken"].as_str().unwrap();
    let claims = ctx.service().codec().verify(new_access).unwrap();
    assert_eq!(claims.sub, SUBJECT);
    assert_eq!(claims.token_type, TokenKind::Access);

    assert_eq!(
        ctx.store.get_refresh_token(SUBJECT).await.unwrap(),
        Some(refresh.token)
    );
}

#[actix_web::test]
async fn test_reissue_rotates_refresh_token_and_sets_cookie() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let refresh = ctx.stored_refresh_token(Duration::seconds(2700)).await;
    let access = ctx.expired_access_token();

    let req = reissue_request(Some(&bearer(&access.token)), Some(&refresh.token)).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "refreshToken")
        .map(|c| c.into_owned())
        .expect("rotated refresh token cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(
        cookie.max_age(),
        Some(actix_web::cookie::time::Duration::days(14))
    );
    assert_ne!(cookie.value(), refresh.token);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["isRefreshTokenReissued"], true);
    assert_eq!(
        ctx.store.get_refresh_token(SUBJECT).await.unwrap().as_deref(),
        Some(cookie.value())
    );
}

#[actix_web::test]
async fn test_reissue_with_unexpired_access_token() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let pair = ctx
        .service()
        .issue_tokens(SUBJECT, &common::roles(&["ROLE_USER"]))
        .await
        .unwrap();

    let req = reissue_request(
        Some(&bearer(&pair.access_token.token)),
        Some(&pair.refresh_token.token),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "ACCESS_TOKEN_NOT_EXPIRED");
}

#[actix_web::test]
async fn test_reissue_error_codes() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let refresh = ctx.stored_refresh_token(Duration::days(14)).await;
    let access = ctx.expired_access_token();
    let header_value = bearer(&access.token);

    let cases = [
        (None, Some(refresh.token.as_str()), StatusCode::BAD_REQUEST, "NO_AUTHORIZATION_HEADER"),
        (
            Some(access.token.as_str()),
            Some(refresh.token.as_str()),
            StatusCode::BAD_REQUEST,
            "NO_AUTHORIZATION_HEADER",
        ),
        (Some(header_value.as_str()), None, StatusCode::BAD_REQUEST, "NO_REFRESH_TOKEN"),
        (
            Some(header_value.as_str()),
            Some("not-the-stored-token"),
            StatusCode::UNAUTHORIZED,
            "INVALID_REFRESH_TOKEN",
        ),
        (
            Some("Bearer not-a-jwt"),
            Some(refresh.token.as_str()),
            StatusCode::UNAUTHORIZED,
            "INVALID_ACCESS_TOKEN",
        ),
    ];

    for (authorization, cookie, status, code) in cases {
        let req = reissue_request(authorization, cookie).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), status, "{code}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], code);
        assert!(body["message"].is_string());
    }
}

#[actix_web::test]
async fn test_reissue_with_blacklisted_access_token() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let refresh = ctx.stored_refresh_token(Duration::days(14)).await;
    let access = ctx.expired_access_token();
    ctx.store
        .blacklist(
            TokenCodec::signature(&access.token).unwrap(),
            std::time::Duration::from_secs(60),
        )
        .await
        .unwrap();

    let req = reissue_request(Some(&bearer(&access.token)), Some(&refresh.token)).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_ACCESS_TOKEN");
}

#[actix_web::test]
async fn test_reissue_rejects_other_methods() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri(REISSUE).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
