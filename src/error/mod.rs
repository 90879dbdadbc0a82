//! Error types for the record-mapping helper.
//!
//! This module defines a hierarchical error system:
//! - [`HelperError`]: Top-level errors returned by repository operations
//! - [`StorageError`]: Database operation errors
//! - [`MappingError`]: Light/dark record translation errors
//! - [`ConfigError`]: Configuration errors
//!
//! Absence of a record is never an error: lookups return `Ok(None)`.
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

/// Top-level helper error.
///
/// This is the main error type returned by repository operations.
/// It wraps all subsystem errors for unified error handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HelperError {
    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Record mapping error.
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Storage errors.
///
/// These errors represent failures in database operations. They are
/// propagated unmodified: no retries, no translation layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Failed to connect to the database.
    #[error("Database connection failed: {message}")]
    ConnectionFailed {
        /// Description of the connection failure.
        message: String,
    },

    /// A database query failed.
    #[error("Query failed: {query} - {message}")]
    QueryFailed {
        /// Short label for the query that failed.
        query: String,
        /// Description of the failure.
        message: String,
    },

    /// Applying a schema migration failed.
    #[error("Migration failed: {version} - {message}")]
    MigrationFailed {
        /// The migration version that failed.
        version: String,
        /// Description of the failure.
        message: String,
    },

    /// Internal storage error.
    #[error("Internal storage error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

/// Record mapping errors.
///
/// These errors represent failures translating between light records and
/// dark rows. A missing required field surfaces here as a construction
/// failure, not as a storage error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Constructing the light record from a dark row failed.
    #[error("Record construction failed: {message}")]
    Construction {
        /// Description of the construction failure.
        message: String,
    },

    /// Serializing a light-shaped input failed.
    #[error("Input serialization failed: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// A partial input was not a key/value object.
    #[error("Partial input must be an object")]
    NotAnObject,

    /// A row column has a type the mapper cannot represent.
    #[error("Unsupported column type for {column}")]
    UnsupportedColumn {
        /// The offending column name.
        column: String,
    },

    /// An update payload mapped to zero columns.
    #[error("Update payload maps to no columns")]
    EmptyPayload,
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
