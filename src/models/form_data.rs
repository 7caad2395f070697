use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::DbPool;

/// Which route family a stored record belongs to.
/// `List` values are JSON arrays, `Document` values are JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    List,
    Document,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::List => "list",
            Shape::Document => "document",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "list" => Some(Shape::List),
            "document" => Some(Shape::Document),
            _ => None,
        }
    }

    /// Path segment used by the HTTP routes (`/api/<subtype>/<segment>/<type>`).
    pub fn route_segment(&self) -> &'static str {
        match self {
            Shape::List => "form",
            Shape::Document => "json",
        }
    }

    /// Coerce incoming `values` into the shape's container kind.
    pub fn coerce(&self, values: Value) -> Value {
        match (self, values) {
            (Shape::List, v @ Value::Array(_)) => v,
            (Shape::List, _) => Value::Array(Vec::new()),
            (Shape::Document, v @ Value::Object(_)) => v,
            (Shape::Document, _) => Value::Object(serde_json::Map::new()),
        }
    }
}

/// Composite key addressing one stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    #[serde(rename = "type")]
    pub record_type: String,
    pub subtype: String,
}

impl RecordKey {
    pub fn new(record_type: &str, subtype: &str) -> Self {
        RecordKey {
            record_type: record_type.to_string(),
            subtype: subtype.to_string(),
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.subtype, self.record_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub record_type: String,
    pub subtype: String,
    pub values: Value,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// One row of the per-site overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    #[serde(rename = "type")]
    pub record_type: String,
    pub shape: Shape,
    pub updated_at: Option<NaiveDateTime>,
}

impl FormRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let raw: String = row.get("values_json")?;
        Ok(FormRecord {
            id: row.get("id")?,
            record_type: row.get("type")?,
            subtype: row.get("subtype")?,
            values: serde_json::from_str(&raw).unwrap_or(Value::Null),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.record_type, &self.subtype)
    }

    pub fn find(pool: &DbPool, shape: Shape, key: &RecordKey) -> Result<Option<Self>, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.query_row(
            "SELECT * FROM form_data WHERE shape = ?1 AND type = ?2 AND subtype = ?3",
            params![shape.as_str(), key.record_type, key.subtype],
            Self::from_row,
        )
        .optional()
        .map_err(|e| e.to_string())
    }

    /// Create or replace the record for `key`. Returns the persisted row.
    pub fn upsert(
        pool: &DbPool,
        shape: Shape,
        key: &RecordKey,
        values: &Value,
    ) -> Result<Self, String> {
        let json = serde_json::to_string(values).map_err(|e| e.to_string())?;
        {
            let conn = pool.get().map_err(|e| e.to_string())?;
            conn.execute(
                "INSERT INTO form_data (shape, type, subtype, values_json) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(shape, type, subtype)
                 DO UPDATE SET values_json = ?4, updated_at = CURRENT_TIMESTAMP",
                params![shape.as_str(), key.record_type, key.subtype, json],
            )
            .map_err(|e| e.to_string())?;
        }
        Self::find(pool, shape, key)?.ok_or_else(|| format!("record {} vanished after upsert", key))
    }

    /// Returns `false` when nothing was stored under `key`.
    pub fn delete(pool: &DbPool, shape: Shape, key: &RecordKey) -> Result<bool, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let affected = conn
            .execute(
                "DELETE FROM form_data WHERE shape = ?1 AND type = ?2 AND subtype = ?3",
                params![shape.as_str(), key.record_type, key.subtype],
            )
            .map_err(|e| e.to_string())?;
        Ok(affected > 0)
    }

    pub fn list_for_subtype(pool: &DbPool, subtype: &str) -> Vec<SectionSummary> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare(
            "SELECT type, shape, updated_at FROM form_data WHERE subtype = ?1 ORDER BY type, shape",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map(params![subtype], |row| {
            let shape: String = row.get(1)?;
            Ok(SectionSummary {
                record_type: row.get(0)?,
                shape: Shape::from_str(&shape).unwrap_or(Shape::List),
                updated_at: row.get(2)?,
            })
        })
        .map(|rows| rows.filter_map(|r| r.ok()).collect())
        .unwrap_or_default()
    }
}
