//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT lifetimes, signing and the refresh token cookie
//! - `cache` - Redis connection for the token store
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server binding
//!
//! [`AppConfig::load`] layers three sources: built-in defaults for the
//! detected environment, an optional `config.{environment}.toml` file and
//! `APP__`-prefixed environment variables (`APP__AUTH__JWT__SECRET`,
//! `APP__CACHE__URL`, ...).

pub mod auth;
pub mod cache;
pub mod environment;
pub mod server;

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{AuthConfig, CookieConfig, JwtConfig, DEFAULT_JWT_SECRET, MAX_TOKEN_EXPIRY_SECONDS};
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Prefix of environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "APP";

const SUPPORTED_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Built-in defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        let mut config = Self {
            environment,
            logging: LoggingConfig::for_environment(environment),
            ..Default::default()
        };

        if environment.is_production() {
            config.server = ServerConfig::new("0.0.0.0", 8080);
            config.auth.cookie.secure = true;
            config.auth.cookie.same_site = String::from("Strict");
        }

        config
    }

    /// Load configuration for the environment named by `ENVIRONMENT`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for(Environment::from_env())
    }

    /// Load and validate configuration for a given environment
    pub fn load_for(environment: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::for_environment(environment);

        let layered = Config::builder()
            .add_source(Config::try_from(&defaults)?)
            .add_source(File::new(environment.config_file(), FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = layered.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Reject configurations the token service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let jwt = &self.auth.jwt;

        if jwt.secret.is_empty() {
            return Err(ConfigError::Message("auth.jwt.secret must not be empty".into()));
        }
        if jwt.is_using_default_secret() {
            if self.environment.is_production() {
                return Err(ConfigError::Message(
                    "auth.jwt.secret must be set in production".into(),
                ));
            }
            tracing::warn!("Using the default JWT secret; set APP__AUTH__JWT__SECRET outside development");
        }
        if !SUPPORTED_ALGORITHMS.contains(&jwt.algorithm.as_str()) {
            return Err(ConfigError::Message(format!(
                "auth.jwt.algorithm must be one of {:?}, got {}",
                SUPPORTED_ALGORITHMS, jwt.algorithm
            )));
        }
        if jwt.access_token_expiry <= 0 || jwt.refresh_token_expiry <= 0 {
            return Err(ConfigError::Message("token expiries must be positive".into()));
        }
        if jwt.access_token_expiry > MAX_TOKEN_EXPIRY_SECONDS
            || jwt.refresh_token_expiry > MAX_TOKEN_EXPIRY_SECONDS
        {
            return Err(ConfigError::Message(format!(
                "token expiries must not exceed {} seconds",
                MAX_TOKEN_EXPIRY_SECONDS
            )));
        }
        if jwt.reissue_threshold < 0 || jwt.reissue_threshold >= jwt.refresh_token_expiry {
            return Err(ConfigError::Message(
                "auth.jwt.reissue_threshold must be shorter than the refresh token expiry".into(),
            ));
        }
        if self.cache.response_timeout == 0 {
            return Err(ConfigError::Message("cache.response_timeout must be positive".into()));
        }

        Ok(())
    }
}
