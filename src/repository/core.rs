//! Core `SQLite` database handle.
//!
//! This module provides the [`Database`] wrapper around the connection
//! pool. Schema content is the caller's business (migrations are external
//! collaborators); [`Database::apply_schema`] only executes what it is
//! given.

#![allow(clippy::missing_errors_doc)]

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::error::StorageError;

/// `SQLite` database handle.
///
/// Wraps a connection pool shared by every [`TableHelper`] built on it.
/// Cloning is cheap; the pool is shared.
///
/// [`TableHelper`]: super::TableHelper
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a file-backed database.
    ///
    /// Creates parent directories if they don't exist, enables WAL mode,
    /// and creates the database file when missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectionFailed`] if the connection fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let path = Path::new(&config.database_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::ConnectionFailed {
                    message: format!("Failed to create database directory: {e}"),
                })?;
            }
        }

        let options =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", path.display()))
                .map_err(|e| StorageError::ConnectionFailed {
                    message: format!("Invalid database path: {e}"),
                })?
                .journal_mode(SqliteJournalMode::Wal)
                .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to connect to database: {e}"),
            })?;

        Ok(Self { pool })
    }

    /// Open an in-memory database for testing.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            StorageError::ConnectionFailed {
                message: format!("Invalid memory database options: {e}"),
            }
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                message: format!("Failed to create in-memory database: {e}"),
            })?;

        Ok(Self { pool })
    }

    /// Execute a schema definition (DDL), e.g. a test fixture migration.
    ///
    /// Statements are expected to be idempotent (`IF NOT EXISTS`).
    pub async fn apply_schema(&self, version: &str, sql: &str) -> Result<(), StorageError> {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::MigrationFailed {
                version: version.to_string(),
                message: format!("{e}"),
            })?;

        Ok(())
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub mod tests {
    use super::*;
    use serial_test::serial;

    pub async fn test_database() -> Database {
        Database::in_memory()
            .await
            .expect("Failed to create test database")
    }

    #[tokio::test]
    #[serial]
    async fn test_in_memory() {
        let db = Database::in_memory().await;
        assert!(db.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_connect_with_file() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let config = DatabaseConfig {
            database_path: temp_dir
                .path()
                .join("records.db")
                .to_string_lossy()
                .into_owned(),
            max_connections: 2,
        };

        let db = Database::connect(&config).await;
        assert!(db.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_connect_creates_nested_directories() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let config = DatabaseConfig {
            database_path: temp_dir
                .path()
                .join("deeply")
                .join("nested")
                .join("records.db")
                .to_string_lossy()
                .into_owned(),
            max_connections: 1,
        };

        let db = Database::connect(&config).await;
        assert!(db.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_apply_schema() {
        let db = test_database().await;
        let result = db
            .apply_schema(
                "unit",
                "CREATE TABLE IF NOT EXISTS items (id TEXT PRIMARY KEY)",
            )
            .await;
        assert!(result.is_ok());

        // Idempotent re-application
        let result = db
            .apply_schema(
                "unit",
                "CREATE TABLE IF NOT EXISTS items (id TEXT PRIMARY KEY)",
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_apply_schema_invalid_sql() {
        let db = test_database().await;
        let result = db.apply_schema("broken", "CREATE TABEL oops").await;

        match result {
            Err(StorageError::MigrationFailed { version, .. }) => {
                assert_eq!(version, "broken");
            }
            other => panic!("Expected MigrationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_pool_is_usable() {
        let db = test_database().await;
        let result = sqlx::query("SELECT 1 as value").fetch_one(db.pool()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_database_clone_shares_pool() {
        let db1 = test_database().await;
        let db2 = db1.clone();

        db1.apply_schema("unit", "CREATE TABLE IF NOT EXISTS shared (id TEXT PRIMARY KEY)")
            .await
            .expect("schema");

        let result = sqlx::query("SELECT count(*) FROM shared")
            .fetch_one(db2.pool())
            .await;
        assert!(result.is_ok());
    }
}
