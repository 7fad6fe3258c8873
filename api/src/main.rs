use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use auth_api::{create_app, telemetry, AppState};
use auth_core::repositories::TokenStore;
use auth_core::services::{TokenService, TokenServiceConfig};
use auth_infra::cache::{RedisClient, RedisTokenStore};
use auth_shared::config::AppConfig;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.logging)?;

    info!(environment = %config.environment, "Starting auth API server");

    let redis = RedisClient::new(config.cache.clone())
        .await
        .context("Failed to connect to Redis")?;
    let store: Arc<dyn TokenStore> = Arc::new(RedisTokenStore::new(redis));
    let token_config = TokenServiceConfig::from_jwt_config(&config.auth.jwt)?;

    let state = web::Data::new(AppState::new(
        TokenService::new(store, token_config),
        config.auth.cookie.clone(),
    ));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server.bind(&bind_address)?.run().await?;

    info!("Server stopped");
    Ok(())
}
