//! Configuration validation.
//!
//! This module provides validation logic for configuration values,
//! ensuring they are within acceptable ranges.

use super::DatabaseConfig;
use crate::error::ConfigError;

/// Minimum allowed pool connections.
pub const MIN_CONNECTIONS: u32 = 1;

/// Maximum allowed pool connections.
pub const MAX_CONNECTIONS_LIMIT: u32 = 64;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `DATABASE_PATH` must not be empty
/// - `DATABASE_MAX_CONNECTIONS` must be between 1 and 64
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "DATABASE_PATH".into(),
            reason: "must not be empty".into(),
        });
    }

    if config.max_connections < MIN_CONNECTIONS || config.max_connections > MAX_CONNECTIONS_LIMIT {
        return Err(ConfigError::InvalidValue {
            var: "DATABASE_MAX_CONNECTIONS".into(),
            reason: format!("must be between {MIN_CONNECTIONS} and {MAX_CONNECTIONS_LIMIT}"),
        });
    }

    Ok(())
}
