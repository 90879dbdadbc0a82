//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Configuration validation
//! - Default value handling
//!
//! The configuration is an explicit immutable struct: it is built once,
//! merged with caller overrides at construction time, and never mutated
//! afterwards.
//!
//! # Example
//!
//! ```
//! use rdbms_helper::config::{DatabaseConfig, DEFAULT_MAX_CONNECTIONS};
//!
//! // Create a config directly (use DatabaseConfig::from_env() in production)
//! let config = DatabaseConfig {
//!     database_path: "./data/records.db".to_string(),
//!     max_connections: DEFAULT_MAX_CONNECTIONS,
//! };
//!
//! assert_eq!(config.max_connections, 5);
//! ```

mod validation;

pub use validation::{validate_config, MAX_CONNECTIONS_LIMIT, MIN_CONNECTIONS};

use crate::error::ConfigError;

/// Default database path.
pub const DEFAULT_DATABASE_PATH: &str = "./data/records.db";

/// Default maximum pool connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database configuration.
///
/// This struct holds the connection settings used by
/// [`Database::connect`](crate::repository::Database::connect).
/// Use [`DatabaseConfig::from_env`] to load it from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path to the `SQLite` database file.
    pub database_path: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `DATABASE_PATH`: Path to `SQLite` database (default: `./data/records.db`)
    /// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: `5`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `DATABASE_MAX_CONNECTIONS` is not a valid positive integer
    /// - Any value fails validation (see [`validate_config`])
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());

        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: "DATABASE_MAX_CONNECTIONS".to_string(),
                    reason: "must be a positive integer".to_string(),
                })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let config = Self {
            database_path,
            max_connections,
        };

        validate_config(&config)?;

        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("DATABASE_PATH");
        std::env::remove_var("DATABASE_MAX_CONNECTIONS");
    }

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = DatabaseConfig::from_env().expect("config");
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("DATABASE_PATH", "/tmp/records-test.db");
        std::env::set_var("DATABASE_MAX_CONNECTIONS", "2");

        let config = DatabaseConfig::from_env().expect("config");
        assert_eq!(config.database_path, "/tmp/records-test.db");
        assert_eq!(config.max_connections, 2);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_max_connections() {
        clear_env();
        std::env::set_var("DATABASE_MAX_CONNECTIONS", "not-a-number");

        let result = DatabaseConfig::from_env();
        assert!(matches!(
            result,
            Err(crate::error::ConfigError::InvalidValue { .. })
        ));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_zero_connections_rejected() {
        clear_env();
        std::env::set_var("DATABASE_MAX_CONNECTIONS", "0");

        let result = DatabaseConfig::from_env();
        assert!(result.is_err());

        clear_env();
    }
}
