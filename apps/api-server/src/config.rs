//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use inkpost_infra::{DatabaseConfig, JwtConfig};

use crate::telemetry::TelemetryConfig;

/// Deployment mode; controls how much error detail reaches clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" | "test" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment `{other}`")),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub slow_request_threshold: Duration,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let environment = lookup("APP_ENV")
            .or_else(|| lookup("RUST_ENV"))
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let database = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: parsed("DB_MAX_CONNECTIONS").map_or(100, |n| n as u32),
                min_connections: parsed("DB_MIN_CONNECTIONS").map_or(10, |n| n as u32),
            });

        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: lookup("JWT_EXPIRATION_HOURS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: lookup("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(8080),
            environment,
            database,
            jwt,
            slow_request_threshold: Duration::from_millis(
                parsed("SLOW_REQUEST_MS").unwrap_or(1000),
            ),
            telemetry: TelemetryConfig::from_lookup(&lookup),
        }
    }

    /// Log configuration problems that should not stop the server.
    pub fn warn_on_insecure_defaults(&self) {
        if !self.jwt.uses_default_secret() {
            return;
        }
        match self.environment {
            Environment::Production => tracing::error!(
                "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
            ),
            Environment::Development => {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, Environment::Development);
        assert!(config.database.is_none());
        assert!(config.jwt.uses_default_secret());
        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.slow_request_threshold, Duration::from_millis(1000));
        assert!(!config.telemetry.json_logs);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://localhost/inkpost"),
            ("DB_MAX_CONNECTIONS", "5"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION_HOURS", "168"),
            ("SLOW_REQUEST_MS", "250"),
            ("LOG_FORMAT", "JSON"),
        ]);

        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, Environment::Production);
        let database = config.database.unwrap();
        assert_eq!(database.max_connections, 5);
        assert_eq!(database.min_connections, 10);
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.expiration_hours, 168);
        assert_eq!(config.slow_request_threshold, Duration::from_millis(250));
        assert!(config.telemetry.json_logs);
    }

    #[test]
    fn test_rust_env_fallback_and_garbage() {
        let config = config_from(&[("RUST_ENV", "prod"), ("PORT", "not-a-port")]);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.port, 8080);

        let config = config_from(&[("APP_ENV", "staging")]);
        assert_eq!(config.environment, Environment::Development);
    }
}
