//! Configuration module
//!
//! Environment-driven configuration for the API binary and services. Every
//! setting has a development default except the database URL and, in
//! production, the JWT secret.

use std::env;

use crate::error::AppError;

const DEFAULT_SERVER_PORT: u16 = 3001;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
const DEFAULT_MAX_DOCUMENT_SIZE_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_VERIFIER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ASSISTANT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,

    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,

    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,

    /// Root directory for uploaded document files.
    pub storage_path: String,
    /// Base URL under which stored files are addressable.
    pub storage_base_url: String,
    pub max_document_size_bytes: usize,

    /// External document verification endpoint (multipart POST).
    pub verifier_url: String,
    pub verifier_timeout_seconds: u64,

    /// Optional chat-completions endpoint for the assistant proxy.
    /// The assistant routes report NotFound when unset.
    pub assistant_url: Option<String>,
    pub assistant_api_key: Option<String>,
    pub assistant_timeout_seconds: u64,

    /// Optional path overriding the embedded scheme catalog.
    pub scheme_catalog_path: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Internal(format!("Invalid value for {}: {:?}", key, raw))),
        Err(_) => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Internal("DATABASE_URL must be set".to_string()))?;

        Ok(Config {
            server_port: parse_env("PORT", DEFAULT_SERVER_PORT)?,
            environment: env_or("ENVIRONMENT", "development"),
            cors_origins: parse_list(&env_or("CORS_ORIGINS", "*")),
            database_url,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            db_timeout_seconds: parse_env("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS)?,
            jwt_secret: env_or("JWT_SECRET", "dev-secret-change-me"),
            jwt_expiry_hours: parse_env("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
            storage_path: env_or("STORAGE_PATH", "./data/uploads"),
            storage_base_url: env_or("STORAGE_BASE_URL", "http://localhost:3001/files"),
            max_document_size_bytes: parse_env(
                "MAX_DOCUMENT_SIZE_BYTES",
                DEFAULT_MAX_DOCUMENT_SIZE_BYTES,
            )?,
            verifier_url: env_or("VERIFIER_URL", "http://localhost:5000/verify"),
            verifier_timeout_seconds: parse_env(
                "VERIFIER_TIMEOUT_SECONDS",
                DEFAULT_VERIFIER_TIMEOUT_SECS,
            )?,
            assistant_url: env::var("ASSISTANT_URL").ok(),
            assistant_api_key: env::var("ASSISTANT_API_KEY").ok(),
            assistant_timeout_seconds: parse_env(
                "ASSISTANT_TIMEOUT_SECONDS",
                DEFAULT_ASSISTANT_TIMEOUT_SECS,
            )?,
            scheme_catalog_path: env::var("SCHEME_CATALOG_PATH").ok(),
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Fail fast on misconfiguration that would only surface under load.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_production() && self.jwt_secret == "dev-secret-change-me" {
            return Err(AppError::Internal(
                "JWT_SECRET must be set to a real secret in production".to_string(),
            ));
        }
        if self.jwt_secret.len() < 16 {
            return Err(AppError::Internal(
                "JWT_SECRET must be at least 16 characters".to_string(),
            ));
        }
        if self.max_document_size_bytes == 0 {
            return Err(AppError::Internal(
                "MAX_DOCUMENT_SIZE_BYTES must be greater than zero".to_string(),
            ));
        }
        if self.verifier_timeout_seconds == 0 {
            return Err(AppError::Internal(
                "VERIFIER_TIMEOUT_SECONDS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server_port: 3001,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            database_url: "postgres://localhost/seva".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            jwt_secret: "dev-secret-change-me".to_string(),
            jwt_expiry_hours: 24,
            storage_path: "./data/uploads".to_string(),
            storage_base_url: "http://localhost:3001/files".to_string(),
            max_document_size_bytes: 10 * 1024 * 1024,
            verifier_url: "http://localhost:5000/verify".to_string(),
            verifier_timeout_seconds: 30,
            assistant_url: None,
            assistant_api_key: None,
            assistant_timeout_seconds: 30,
            scheme_catalog_path: None,
        }
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list("http://a.example, http://b.example"),
            vec!["http://a.example".to_string(), "http://b.example".to_string()]
        );
        assert_eq!(parse_list("*"), vec!["*".to_string()]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_validate_accepts_dev_defaults() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_default_secret_in_production() {
        let mut config = test_config();
        config.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.jwt_secret = "a-real-production-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let mut config = test_config();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = test_config();
        config.max_document_size_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = test_config();
        assert!(!config.is_production());
        config.environment = "PROD".to_string();
        assert!(config.is_production());
    }
}
