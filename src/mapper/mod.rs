//! Light/dark record mapping.
//!
//! This module provides bidirectional translation between two shapes of the
//! same record:
//! - the *light* shape: an application-facing type with domain field names,
//!   constructed through serde deserialization
//! - the *dark* shape: a storage-facing mapping from column name to
//!   primitive value ([`DarkRow`])
//!
//! Field names may differ between the two shapes via an explicit per-field
//! rename table, fixed at construction and never mutated at runtime.
//!
//! # Example
//!
//! ```
//! use rdbms_helper::mapper::{RecordMapper, RecordMapping};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Contact {
//!     id: String,
//!     display_name: String,
//! }
//!
//! let mapper: RecordMapper<Contact> = RecordMapper::builder()
//!     .field("id")
//!     .field_as("display_name", "display_name_col")
//!     .build();
//!
//! let dark = mapper
//!     .partial_to_dark(&serde_json::json!({"display_name": "Ada"}))
//!     .unwrap();
//! assert!(dark.contains_key("display_name_col"));
//! ```

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::MappingError;

/// Storage-row shape: column name mapped to a primitive value.
pub type DarkRow = serde_json::Map<String, Value>;

/// One light-name to dark-name association.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldMapping {
    light: String,
    dark: String,
}

/// Contract for light/dark record translation.
///
/// The repository helper depends on this trait rather than a concrete
/// mapper, so callers can substitute their own translation (or a mock in
/// tests). [`RecordMapper`] is the shipped implementation.
pub trait RecordMapping<T: 'static>: Send + Sync {
    /// Construct a light record from a complete dark row.
    ///
    /// Registered fields are renamed dark to light; unregistered columns are
    /// ignored. A required field absent from the row surfaces as
    /// [`MappingError::Construction`].
    fn map_to_light(&self, row: &DarkRow) -> Result<T, MappingError>;

    /// Convert a partial light-shaped object into a partial dark row.
    ///
    /// Only registered fields that are present and non-null in `input` are
    /// emitted, renamed light to dark. Null and absent both mean "not
    /// supplied".
    fn map_partial_to_dark(&self, input: &Value) -> Result<DarkRow, MappingError>;

    /// Resolve the dark column name for a light field name.
    ///
    /// Pure lookup; used once at helper construction to resolve managed
    /// timestamp columns.
    fn dark_name(&self, light: &str) -> Option<String>;

    /// Apply [`Self::map_to_light`] to each row, preserving order.
    fn map_all_to_light(&self, rows: &[DarkRow]) -> Result<Vec<T>, MappingError> {
        rows.iter().map(|row| self.map_to_light(row)).collect()
    }
}

// Test-only mock of [`RecordMapping`]. Declared with `mockall::mock!` rather
// than `#[automock]` so the generated impl can carry a `T: Send + Sync` bound;
// the generated mock struct holds a `PhantomData<T>`, which only satisfies the
// trait's `Send + Sync` supertraits when `T` does. The public trait keeps its
// `T: 'static` bound unchanged.
#[cfg(test)]
mockall::mock! {
    pub RecordMapping<T: 'static + Send + Sync> {}

    impl<T: 'static + Send + Sync> RecordMapping<T> for RecordMapping<T> {
        fn map_to_light(&self, row: &DarkRow) -> Result<T, MappingError>;
        fn map_partial_to_dark(&self, input: &Value) -> Result<DarkRow, MappingError>;
        fn dark_name(&self, light: &str) -> Option<String>;
    }
}

/// Serde-backed [`RecordMapping`] implementation.
///
/// The rename table is assembled through [`MapperBuilder`]; deserialization
/// into `T` acts as the light-record factory.
pub struct RecordMapper<T> {
    fields: Vec<FieldMapping>,
    _record: PhantomData<fn() -> T>,
}

impl<T> RecordMapper<T> {
    /// Start building a mapper.
    #[must_use]
    pub fn builder() -> MapperBuilder<T> {
        MapperBuilder {
            fields: Vec::new(),
            _record: PhantomData,
        }
    }

    /// Serialize any light-shaped input and convert it to a partial dark row.
    ///
    /// Convenience over [`RecordMapping::map_partial_to_dark`] for typed
    /// inputs (creation payloads, update payloads).
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Serialization`] if `input` fails to
    /// serialize, [`MappingError::NotAnObject`] if it is not a key/value
    /// object.
    pub fn partial_to_dark<I: Serialize>(&self, input: &I) -> Result<DarkRow, MappingError> {
        let value = serde_json::to_value(input).map_err(|e| MappingError::Serialization {
            message: e.to_string(),
        })?;
        self.partial_value_to_dark(&value)
    }

    fn lookup_dark(&self, light: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|mapping| mapping.light == light)
            .map(|mapping| mapping.dark.as_str())
    }

    fn partial_value_to_dark(&self, input: &Value) -> Result<DarkRow, MappingError> {
        let object = input.as_object().ok_or(MappingError::NotAnObject)?;

        let mut dark = DarkRow::new();
        for mapping in &self.fields {
            match object.get(&mapping.light) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    dark.insert(mapping.dark.clone(), value.clone());
                }
            }
        }
        Ok(dark)
    }
}

impl<T> Clone for RecordMapper<T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for RecordMapper<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordMapper")
            .field("fields", &self.fields)
            .finish()
    }
}

impl<T> RecordMapping<T> for RecordMapper<T>
where
    T: DeserializeOwned + 'static,
{
    fn map_to_light(&self, row: &DarkRow) -> Result<T, MappingError> {
        let mut light = serde_json::Map::new();
        for mapping in &self.fields {
            if let Some(value) = row.get(&mapping.dark) {
                light.insert(mapping.light.clone(), value.clone());
            }
        }

        serde_json::from_value(Value::Object(light)).map_err(|e| MappingError::Construction {
            message: e.to_string(),
        })
    }

    fn map_partial_to_dark(&self, input: &Value) -> Result<DarkRow, MappingError> {
        self.partial_value_to_dark(input)
    }

    fn dark_name(&self, light: &str) -> Option<String> {
        self.lookup_dark(light).map(str::to_string)
    }
}

/// Builder for [`RecordMapper`].
///
/// Each light field name maps to exactly one dark column name;
/// re-registering a light name replaces the earlier mapping.
#[derive(Debug)]
pub struct MapperBuilder<T> {
    fields: Vec<FieldMapping>,
    _record: PhantomData<fn() -> T>,
}

impl<T> MapperBuilder<T> {
    /// Register a field whose light and dark names are identical.
    #[must_use]
    pub fn field(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let dark = name.clone();
        self.field_as(name, dark)
    }

    /// Register a field with an explicit dark column name.
    #[must_use]
    pub fn field_as(mut self, light: impl Into<String>, dark: impl Into<String>) -> Self {
        let light = light.into();
        let dark = dark.into();
        self.fields.retain(|mapping| mapping.light != light);
        self.fields.push(FieldMapping { light, dark });
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> RecordMapper<T> {
        RecordMapper {
            fields: self.fields,
            _record: PhantomData,
        }
    }
}
