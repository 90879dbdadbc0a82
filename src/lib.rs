//! Light/dark record mapping and table-scoped CRUD helpers over `SQLite`.
//!
//! A thin convenience layer over the database: records are translated
//! between an application-facing "light" shape and a storage-facing "dark"
//! shape, primary-key identifiers are generated at creation, and
//! creation/update timestamp columns are populated automatically. Every
//! operation is a direct pass-through to `sqlx`; there is no caching, no
//! transaction management, and no retry policy.
//!
//! # Quick Start
//!
//! ```no_run
//! use rdbms_helper::mapper::RecordMapper;
//! use rdbms_helper::repository::{Database, TableHelper};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Contact {
//!     id: String,
//!     display_name: String,
//!     created_at: String,
//!     updated_at: String,
//! }
//!
//! # async fn run() -> Result<(), rdbms_helper::error::HelperError> {
//! let db = Database::in_memory().await?;
//! let mapper: RecordMapper<Contact> = RecordMapper::builder()
//!     .field("id")
//!     .field_as("display_name", "display_name_col")
//!     .field("created_at")
//!     .field("updated_at")
//!     .build();
//!
//! let contacts = TableHelper::new(db, "contacts", mapper);
//! let created = contacts
//!     .create(&serde_json::json!({"display_name": "Ada"}))
//!     .await?;
//! let found = contacts.find_by_id(&created.id).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  light record   ┌──────────────┐  dark row   ┌────────┐
//! │ Application  │◀───────────────▶│ TableHelper  │◀───────────▶│ SQLite │
//! │    code      │                 │  + mapper    │   (sqlx)    │        │
//! └──────────────┘                 └──────────────┘             └────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod id;
pub mod mapper;
pub mod repository;
