//! Repository layer.
//!
//! This module provides:
//! - [`Database`]: `SQLite` pool wrapper (file-backed or in-memory)
//! - [`TableHelper`]: table-scoped find/create/update/delete operations
//! - [`Filter`]: field-equality predicates for lookups
//! - [`TimestampPolicy`]: configuration for auto-managed timestamp columns
//!
//! # Architecture
//!
//! Every operation is a direct pass-through to `sqlx`: the helper builds a
//! statement with [`sqlx::QueryBuilder`], executes it against the shared
//! pool, and translates rows through the record mapper. The helper holds no
//! per-call state; instances are cheap to clone and safe to share across
//! tasks.
//!
//! The implementation is split across submodules:
//! - `core`: pool management and schema application
//! - `helper`: the table helper and its predicate/policy types
//! - `row`: decoding `SQLite` rows into the dark shape

mod core;
mod helper;
mod row;

pub use self::core::Database;
pub use helper::{Filter, TableHelper, TableQueryBuilder, TimestampPolicy};
