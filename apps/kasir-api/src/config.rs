//! Kasir API configuration module.
//!
//! Layered with the `config` crate, later sources winning:
//! 1. Built-in defaults ([`ApiConfig::default`])
//! 2. Optional `kasir.toml` in the working directory
//! 3. `KASIR_*` environment variables (`KASIR_HTTP_PORT=9000`, ...)

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use kasir_core::{DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_TOP_PRODUCTS};

/// Shortest accepted JWT signing secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 16;

/// Kasir API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP server port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// Token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Dashboard lists products with stock at or below this
    pub low_stock_threshold: i64,

    /// Dashboard best-seller count
    pub top_products_limit: i64,

    /// Connection pool size
    pub max_connections: u32,

    /// Filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_port: 8000,
            database_path: "kasir.db".to_string(),
            // In production, this MUST be set via KASIR_JWT_SECRET
            jwt_secret: "kasir-dev-secret-change-in-production".to_string(),
            jwt_lifetime_secs: 3600, // 1 hour
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            top_products_limit: DEFAULT_TOP_PRODUCTS,
            max_connections: 5,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from defaults, `kasir.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config: ApiConfig = Config::builder()
            .add_source(Config::try_from(&ApiConfig::default())?)
            .add_source(File::with_name("kasir").required(false))
            .add_source(Environment::with_prefix("KASIR").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_port == 0 {
            return Err(ConfigError::InvalidValue("http_port".to_string()));
        }

        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::WeakSecret(MIN_JWT_SECRET_LEN));
        }

        if self.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("jwt_lifetime_secs".to_string()));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }

        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("jwt_secret must be at least {0} bytes")]
    WeakSecret(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.jwt_lifetime_secs, 3600);
        assert_eq!(config.low_stock_threshold, 10);
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = ApiConfig {
            jwt_secret: "short".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::WeakSecret(16))));
    }

    #[test]
    fn test_zero_port_rejected() {
        let config = ApiConfig {
            http_port: 0,
            ..ApiConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }
}
