//! Application configuration

use std::env;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub public_url: String, // Frontend origin allowed by CORS

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // Sessions (written by the login flow, read here)
    pub redis_url: String,
    pub session_cookie_name: String,
    pub session_key_prefix: String,

    // Logging
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),

            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Sessions
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            session_cookie_name: {
                let name =
                    env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "helpdesk.sid".to_string());
                if name.trim().is_empty() {
                    return Err(ConfigError::Invalid("SESSION_COOKIE_NAME must not be empty"));
                }
                name
            },
            session_key_prefix: env::var("SESSION_KEY_PREFIX")
                .unwrap_or_else(|_| "sess:".to_string()),

            // Logging
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                Ok("pretty") | Err(_) => LogFormat::Pretty,
                Ok(_) => {
                    return Err(ConfigError::Invalid("LOG_FORMAT must be \"pretty\" or \"json\""))
                }
            },
        })
    }
}

impl Default for Config {
    /// Local development defaults
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            public_url: "http://localhost:5173".to_string(),
            database_url: "postgres://localhost/helpdesk".to_string(),
            database_max_connections: 10,
            redis_url: "redis://localhost:6379".to_string(),
            session_cookie_name: "helpdesk.sid".to_string(),
            session_key_prefix: "sess:".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
