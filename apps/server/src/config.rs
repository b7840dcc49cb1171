//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use std::env;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Secret used to verify bearer tokens
    pub jwt_secret: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("TALLY_HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TALLY_HTTP_PORT".to_string()))?,

            database_path: env::var("TALLY_DATABASE_PATH")
                .unwrap_or_else(|_| "./tally.db".to_string()),

            jwt_secret: env::var("TALLY_JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "tally-dev-secret-change-in-production".to_string()
            }),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
