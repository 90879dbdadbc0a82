//! Table-scoped repository operations.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::should_implement_trait)]

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite};

use crate::error::{HelperError, MappingError, StorageError};
use crate::id::IdGenerator;
use crate::mapper::{RecordMapper, RecordMapping};

use super::core::Database;
use super::row::row_to_dark;

/// SQL expression producing the storage server's current time at
/// millisecond precision. Using the server clock keeps `updated_at`
/// ordering consistent across callers with skewed application clocks.
const DB_SERVER_NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ','now')";

/// Query builder handle passed to modifier callbacks.
///
/// Modifiers receive the builder after the helper has written the statement
/// head and append further SQL (predicates, ordering, joins) before the
/// helper executes it: an explicit configure-then-execute contract.
pub type TableQueryBuilder = QueryBuilder<'static, Sqlite>;

/// Configuration for auto-managed timestamp columns.
///
/// A present column name means the helper manages that column: `created_at`
/// is returned from the insert (populated by the storage default),
/// `updated_at` is set to the server clock on every update. An absent name
/// means the column is not tracked at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimestampPolicy {
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl TimestampPolicy {
    /// Policy managing no timestamp columns.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Manage a creation timestamp in the given dark column.
    #[must_use]
    pub fn with_created_at(mut self, column: impl Into<String>) -> Self {
        self.created_at = Some(column.into());
        self
    }

    /// Manage an update timestamp in the given dark column.
    #[must_use]
    pub fn with_updated_at(mut self, column: impl Into<String>) -> Self {
        self.updated_at = Some(column.into());
        self
    }

    /// The managed creation column, if any.
    #[must_use]
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    /// The managed update column, if any.
    #[must_use]
    pub fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }
}

/// Field-equality predicate for lookups.
///
/// Column names are *storage* (dark) names and are interpolated into the
/// statement as-is; values are always bound parameters. A null value
/// renders as `IS NULL`. An empty filter matches every row.
///
/// # Example
///
/// ```
/// use rdbms_helper::repository::Filter;
///
/// let filter = Filter::new().eq("field", "field2").eq("revision", 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Empty filter (matches all rows).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality clause on a storage column.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((column.into(), value.into()));
        self
    }

    /// Whether the filter has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Table-scoped repository helper.
///
/// Wraps one table with find/create/update/delete operations, translating
/// between light records and dark rows through the injected mapper.
/// Configuration (table name, mapper, id generator, timestamp policy) is
/// fixed at construction; operations hold no instance state, so a helper
/// can be shared freely across tasks.
///
/// `update` and `delete` never scope themselves: the caller's modifier must
/// apply the filtering predicate. A modifier that appends no predicate
/// affects **every** row in the table; that is the documented contract, not
/// a guard the helper provides.
pub struct TableHelper<T, M = RecordMapper<T>> {
    db: Database,
    table: String,
    mapper: M,
    id_generator: IdGenerator,
    timestamps: TimestampPolicy,
    _record: PhantomData<fn() -> T>,
}

impl<T, M: Clone> Clone for TableHelper<T, M> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            table: self.table.clone(),
            mapper: self.mapper.clone(),
            id_generator: self.id_generator.clone(),
            timestamps: self.timestamps.clone(),
            _record: PhantomData,
        }
    }
}

impl<T, M> fmt::Debug for TableHelper<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableHelper")
            .field("table", &self.table)
            .field("timestamps", &self.timestamps)
            .finish_non_exhaustive()
    }
}

impl<T, M> TableHelper<T, M>
where
    T: 'static,
    M: RecordMapping<T>,
{
    /// Create a helper with the standard timestamp policy.
    ///
    /// Both timestamp columns are managed; their dark names are resolved
    /// through the mapper's rename table for the light names `created_at` /
    /// `updated_at`, falling back to those literals. Use
    /// [`with_timestamp_policy`](Self::with_timestamp_policy) to override.
    pub fn new(db: Database, table: impl Into<String>, mapper: M) -> Self {
        let created_at = mapper
            .dark_name("created_at")
            .unwrap_or_else(|| "created_at".to_string());
        let updated_at = mapper
            .dark_name("updated_at")
            .unwrap_or_else(|| "updated_at".to_string());
        let timestamps = TimestampPolicy::disabled()
            .with_created_at(created_at)
            .with_updated_at(updated_at);

        Self {
            db,
            table: table.into(),
            mapper,
            id_generator: IdGenerator::default(),
            timestamps,
            _record: PhantomData,
        }
    }

    /// Replace the timestamp policy.
    #[must_use]
    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.timestamps = policy;
        self
    }

    /// Replace the identifier generator.
    #[must_use]
    pub fn with_id_generator(mut self, generator: IdGenerator) -> Self {
        self.id_generator = generator;
        self
    }

    /// The wrapped table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The active timestamp policy.
    #[must_use]
    pub fn timestamp_policy(&self) -> &TimestampPolicy {
        &self.timestamps
    }

    /// A query builder seeded with `SELECT * FROM <table>`.
    #[must_use]
    pub fn query_builder(&self) -> TableQueryBuilder {
        let mut qb = QueryBuilder::new("SELECT * FROM ");
        qb.push(&self.table);
        qb
    }

    /// Find a record by its primary key.
    ///
    /// Returns `Ok(None)` when no row matches; absence is never an error.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>, HelperError> {
        self.find_one(&Filter::new().eq(self.id_column(), id)).await
    }

    /// Find the first record matching the filter.
    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>, HelperError> {
        let mut qb = self.query_builder();
        push_filter(&mut qb, filter);
        qb.push(" LIMIT 1");

        let row = qb
            .build()
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| self.query_failed("SELECT", &e))?;

        match row {
            Some(row) => {
                let dark = row_to_dark(&row)?;
                Ok(Some(self.mapper.map_to_light(&dark)?))
            }
            None => Ok(None),
        }
    }

    /// Find all records matching the filter.
    ///
    /// Rows come back in storage order; no ordering is implied. Use
    /// [`find_with`](Self::find_with) to order explicitly.
    pub async fn find(&self, filter: &Filter) -> Result<Vec<T>, HelperError> {
        let mut qb = self.query_builder();
        push_filter(&mut qb, filter);

        let rows = qb
            .build()
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| self.query_failed("SELECT", &e))?;

        let dark_rows = rows
            .iter()
            .map(row_to_dark)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.mapper.map_all_to_light(&dark_rows)?)
    }

    /// Find all records through an arbitrary query customization.
    ///
    /// The modifier receives the seeded builder and may append predicates,
    /// ordering, or joins. Results still pass through the mapper.
    pub async fn find_with<F>(&self, modifier: F) -> Result<Vec<T>, HelperError>
    where
        F: FnOnce(&mut TableQueryBuilder),
    {
        let mut qb = self.query_builder();
        modifier(&mut qb);

        let rows = qb
            .build()
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| self.query_failed("SELECT", &e))?;

        let dark_rows = rows
            .iter()
            .map(row_to_dark)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.mapper.map_all_to_light(&dark_rows)?)
    }

    /// Find the first record through an arbitrary query customization.
    ///
    /// The helper appends `LIMIT 1` after the modifier runs.
    pub async fn find_one_with<F>(&self, modifier: F) -> Result<Option<T>, HelperError>
    where
        F: FnOnce(&mut TableQueryBuilder),
    {
        let mut qb = self.query_builder();
        modifier(&mut qb);
        qb.push(" LIMIT 1");

        let row = qb
            .build()
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| self.query_failed("SELECT", &e))?;

        match row {
            Some(row) => {
                let dark = row_to_dark(&row)?;
                Ok(Some(self.mapper.map_to_light(&dark)?))
            }
            None => Ok(None),
        }
    }

    /// Insert a new record and return it in light form.
    ///
    /// Generates a fresh identifier unless the input already carries one,
    /// converts the input to dark form, inserts, and asks the database to
    /// return the managed timestamp columns populated by its defaults. The
    /// returned record merges the dark input, the id, and the returned
    /// server-generated values, so no follow-up read is needed.
    pub async fn create<I: Serialize>(&self, input: &I) -> Result<T, HelperError> {
        let input_value = serde_json::to_value(input).map_err(|e| MappingError::Serialization {
            message: e.to_string(),
        })?;
        let mut dark = self.mapper.map_partial_to_dark(&input_value)?;

        let id_column = self.id_column();
        if !dark.contains_key(&id_column) {
            dark.insert(id_column, Value::String(self.id_generator.generate()));
        }

        let returning: Vec<String> = [self.timestamps.created_at(), self.timestamps.updated_at()]
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();

        tracing::debug!(table = %self.table, "inserting record");

        let mut qb: TableQueryBuilder = QueryBuilder::new("INSERT INTO ");
        qb.push(&self.table);
        qb.push(" (");
        let mut first = true;
        for column in dark.keys() {
            if !first {
                qb.push(", ");
            }
            qb.push(column);
            first = false;
        }
        qb.push(") VALUES (");
        let mut first = true;
        for value in dark.values() {
            if !first {
                qb.push(", ");
            }
            push_bind_value(&mut qb, value);
            first = false;
        }
        qb.push(")");

        if returning.is_empty() {
            qb.build()
                .execute(self.db.pool())
                .await
                .map_err(|e| self.query_failed("INSERT", &e))?;
        } else {
            qb.push(" RETURNING ");
            let mut first = true;
            for column in &returning {
                if !first {
                    qb.push(", ");
                }
                qb.push(column);
                first = false;
            }

            let row = qb
                .build()
                .fetch_one(self.db.pool())
                .await
                .map_err(|e| self.query_failed("INSERT", &e))?;

            for (column, value) in row_to_dark(&row)? {
                dark.insert(column, value);
            }
        }

        Ok(self.mapper.map_to_light(&dark)?)
    }

    /// Update records in place.
    ///
    /// Converts the input to dark form; if `updated_at` is managed, also
    /// sets that column to the current *database-server* time. The modifier
    /// must append the scoping predicate (`WHERE …`); without one, every
    /// row in the table is updated. Returns nothing; re-`find` to observe
    /// the result.
    pub async fn update<I, F>(&self, input: &I, modifier: F) -> Result<(), HelperError>
    where
        I: Serialize,
        F: FnOnce(&mut TableQueryBuilder),
    {
        let input_value = serde_json::to_value(input).map_err(|e| MappingError::Serialization {
            message: e.to_string(),
        })?;
        let dark = self.mapper.map_partial_to_dark(&input_value)?;

        if dark.is_empty() && self.timestamps.updated_at().is_none() {
            return Err(MappingError::EmptyPayload.into());
        }

        tracing::debug!(table = %self.table, "updating records");

        let mut qb: TableQueryBuilder = QueryBuilder::new("UPDATE ");
        qb.push(&self.table);
        qb.push(" SET ");
        let mut first = true;
        for (column, value) in &dark {
            if !first {
                qb.push(", ");
            }
            qb.push(column);
            qb.push(" = ");
            push_bind_value(&mut qb, value);
            first = false;
        }
        if let Some(column) = self.timestamps.updated_at() {
            if !first {
                qb.push(", ");
            }
            qb.push(column);
            qb.push(" = ");
            qb.push(DB_SERVER_NOW);
        }

        modifier(&mut qb);

        qb.build()
            .execute(self.db.pool())
            .await
            .map_err(|e| self.query_failed("UPDATE", &e))?;

        Ok(())
    }

    /// Update the record with the given primary key.
    pub async fn update_by_id<I: Serialize>(&self, id: &str, input: &I) -> Result<(), HelperError> {
        self.update_by_id_with(id, input, |_| {}).await
    }

    /// Update by primary key with additional predicate conjuncts.
    ///
    /// The helper writes `WHERE <id column> = ?`; the modifier may append
    /// further `AND …` clauses.
    pub async fn update_by_id_with<I, F>(
        &self,
        id: &str,
        input: &I,
        modifier: F,
    ) -> Result<(), HelperError>
    where
        I: Serialize,
        F: FnOnce(&mut TableQueryBuilder),
    {
        let id_column = self.id_column();
        let id = id.to_string();
        self.update(input, move |qb| {
            qb.push(" WHERE ");
            qb.push(id_column);
            qb.push(" = ");
            qb.push_bind(id);
            modifier(qb);
        })
        .await
    }

    /// Delete records.
    ///
    /// The modifier must append the scoping predicate; without one, every
    /// row in the table is deleted. Deleting zero matching rows is success.
    pub async fn delete<F>(&self, modifier: F) -> Result<(), HelperError>
    where
        F: FnOnce(&mut TableQueryBuilder),
    {
        tracing::debug!(table = %self.table, "deleting records");

        let mut qb: TableQueryBuilder = QueryBuilder::new("DELETE FROM ");
        qb.push(&self.table);
        modifier(&mut qb);

        qb.build()
            .execute(self.db.pool())
            .await
            .map_err(|e| self.query_failed("DELETE", &e))?;

        Ok(())
    }

    /// Delete the record with the given primary key.
    ///
    /// Idempotent: deleting an already-absent id is not an error.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), HelperError> {
        self.delete_by_id_with(id, |_| {}).await
    }

    /// Delete by primary key with additional predicate conjuncts.
    pub async fn delete_by_id_with<F>(&self, id: &str, modifier: F) -> Result<(), HelperError>
    where
        F: FnOnce(&mut TableQueryBuilder),
    {
        let id_column = self.id_column();
        let id = id.to_string();
        self.delete(move |qb| {
            qb.push(" WHERE ");
            qb.push(id_column);
            qb.push(" = ");
            qb.push_bind(id);
            modifier(qb);
        })
        .await
    }

    fn id_column(&self) -> String {
        self.mapper
            .dark_name("id")
            .unwrap_or_else(|| "id".to_string())
    }

    fn query_failed(&self, verb: &str, error: &sqlx::Error) -> StorageError {
        StorageError::QueryFailed {
            query: format!("{verb} {}", self.table),
            message: error.to_string(),
        }
    }
}

fn push_filter(qb: &mut TableQueryBuilder, filter: &Filter) {
    let mut first = true;
    for (column, value) in &filter.clauses {
        qb.push(if first { " WHERE " } else { " AND " });
        qb.push(column);
        if value.is_null() {
            qb.push(" IS NULL");
        } else {
            qb.push(" = ");
            push_bind_value(qb, value);
        }
        first = false;
    }
}

fn push_bind_value(qb: &mut TableQueryBuilder, value: &Value) {
    match value {
        Value::Null => {
            qb.push_bind(None::<String>);
        }
        Value::Bool(flag) => {
            qb.push_bind(*flag);
        }
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                qb.push_bind(int);
            } else if let Some(float) = number.as_f64() {
                qb.push_bind(float);
            } else {
                qb.push_bind(number.to_string());
            }
        }
        Value::String(text) => {
            qb.push_bind(text.clone());
        }
        other => {
            qb.push_bind(other.to_string());
        }
    }
}
