//! Shared setup for the HTTP tests

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use actix_web::web;
use auth_api::AppState;
use auth_core::domain::entities::token::{SignedToken, TokenKind};
use auth_core::repositories::{InMemoryTokenStore, TokenStore};
use auth_core::services::{TokenService, TokenServiceConfig};
use auth_shared::config::CookieConfig;
use chrono::{Duration, Utc};

pub const SUBJECT: &str = "42";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub store: Arc<InMemoryTokenStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryTokenStore::new()))
    }

    pub fn with_store(store: Arc<InMemoryTokenStore>) -> Self {
        let dyn_store: Arc<dyn TokenStore> = store.clone();
        Self {
            state: state_for(dyn_store),
            store,
        }
    }

    pub fn service(&self) -> &TokenService {
        &self.state.token_service
    }

    /// Access token that expired three minutes ago
    pub fn expired_access_token(&self) -> SignedToken {
        let now = Utc::now();
        self.service()
            .codec()
            .issue_at(
                SUBJECT,
                &roles(&["ROLE_USER"]),
                TokenKind::Access,
                now - Duration::seconds(300),
                now - Duration::seconds(180),
            )
            .unwrap()
    }

    /// Refresh token with `remaining` lifetime, stored as the subject's current one
    pub async fn stored_refresh_token(&self, remaining: Duration) -> SignedToken {
        let now = Utc::now();
        let token = self
            .service()
            .codec()
            .issue_at(
                SUBJECT,
                &BTreeSet::new(),
                TokenKind::Refresh,
                now - Duration::seconds(300),
                now + remaining,
            )
            .unwrap();
        self.store
            .put_refresh_token(SUBJECT, &token.token, std::time::Duration::from_secs(3600))
            .await
            .unwrap();
        token
    }
}

pub fn state_for(store: Arc<dyn TokenStore>) -> web::Data<AppState> {
    let config = TokenServiceConfig {
        jwt_secret: "integration-test-secret".to_string(),
        ..TokenServiceConfig::default()
    };
    web::Data::new(AppState::new(
        TokenService::new(store, config),
        CookieConfig::default(),
    ))
}

pub fn roles(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|r| r.to_string()).collect()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
