//! Decoding `SQLite` rows into the dark shape.

use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo};

use crate::error::MappingError;
use crate::mapper::DarkRow;

/// Convert a database row into a [`DarkRow`].
///
/// Dispatches on the column's declared type: INTEGER decodes to a JSON
/// number, BOOLEAN to a JSON bool, REAL/NUMERIC to a float, everything
/// textual to a string. BLOB columns cannot be represented and are
/// rejected.
pub(crate) fn row_to_dark(row: &SqliteRow) -> Result<DarkRow, MappingError> {
    let mut dark = DarkRow::new();

    for column in row.columns() {
        let name = column.name();
        let ordinal = column.ordinal();

        let value = match column.type_info().name() {
            "NULL" => Value::Null,
            "INTEGER" => decode(row.try_get::<Option<i64>, _>(ordinal), name)?
                .map_or(Value::Null, Value::from),
            "BOOLEAN" => decode(row.try_get::<Option<bool>, _>(ordinal), name)?
                .map_or(Value::Null, Value::from),
            "REAL" | "NUMERIC" => decode(row.try_get::<Option<f64>, _>(ordinal), name)?
                .map_or(Value::Null, Value::from),
            "BLOB" => {
                return Err(MappingError::UnsupportedColumn {
                    column: name.to_string(),
                })
            }
            _ => decode(row.try_get::<Option<String>, _>(ordinal), name)?
                .map_or(Value::Null, Value::from),
        };

        dark.insert(name.to_string(), value);
    }

    Ok(dark)
}

fn decode<V>(result: Result<V, sqlx::Error>, column: &str) -> Result<V, MappingError> {
    result.map_err(|e| MappingError::Construction {
        message: format!("Failed to decode column {column}: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::repository::core::tests::test_database;
    use serde_json::json;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_row_to_dark_primitive_types() {
        let db = test_database().await;
        let row = sqlx::query("SELECT 7 AS count, 'seven' AS label, 1.5 AS ratio, NULL AS gap")
            .fetch_one(db.pool())
            .await
            .expect("row");

        let dark = row_to_dark(&row).expect("dark row");

        assert_eq!(dark.get("count"), Some(&json!(7)));
        assert_eq!(dark.get("label"), Some(&json!("seven")));
        assert_eq!(dark.get("ratio"), Some(&json!(1.5)));
        assert_eq!(dark.get("gap"), Some(&Value::Null));
    }

    #[tokio::test]
    #[serial]
    async fn test_row_to_dark_boolean_column() {
        let db = test_database().await;
        db.apply_schema(
            "unit",
            "CREATE TABLE IF NOT EXISTS toggles (id TEXT PRIMARY KEY, enabled BOOLEAN NOT NULL)",
        )
        .await
        .expect("schema");

        sqlx::query("INSERT INTO toggles (id, enabled) VALUES (?, ?)")
            .bind("t-1")
            .bind(true)
            .execute(db.pool())
            .await
            .expect("insert");

        let row = sqlx::query("SELECT * FROM toggles")
            .fetch_one(db.pool())
            .await
            .expect("row");

        let dark = row_to_dark(&row).expect("dark row");
        assert_eq!(dark.get("enabled"), Some(&json!(true)));
    }

    #[tokio::test]
    #[serial]
    async fn test_row_to_dark_nullable_text_column() {
        let db = test_database().await;
        db.apply_schema(
            "unit",
            "CREATE TABLE IF NOT EXISTS notes (id TEXT PRIMARY KEY, body TEXT)",
        )
        .await
        .expect("schema");

        sqlx::query("INSERT INTO notes (id, body) VALUES (?, NULL)")
            .bind("n-1")
            .execute(db.pool())
            .await
            .expect("insert");

        let row = sqlx::query("SELECT * FROM notes")
            .fetch_one(db.pool())
            .await
            .expect("row");

        let dark = row_to_dark(&row).expect("dark row");
        assert_eq!(dark.get("body"), Some(&Value::Null));
    }

    #[tokio::test]
    #[serial]
    async fn test_row_to_dark_rejects_blob() {
        let db = test_database().await;
        let row = sqlx::query("SELECT x'00ff' AS payload")
            .fetch_one(db.pool())
            .await
            .expect("row");

        let result = row_to_dark(&row);
        match result {
            Err(MappingError::UnsupportedColumn { column }) => {
                assert_eq!(column, "payload");
            }
            other => panic!("Expected UnsupportedColumn, got {other:?}"),
        }
    }
}
