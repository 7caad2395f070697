use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde_json::Value;

use crate::models::form_data::{FormRecord, RecordKey, SectionSummary, Shape};

use super::Store;

pub type DbPool = Pool<SqliteConnectionManager>;

/// SQLite-backed implementation of the Store trait.
/// Wraps the r2d2 connection pool and delegates to model methods.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn new_at(path: &str, pool_size: u32) -> Result<Self, String> {
        let pool = crate::db::init_pool_at(path, pool_size)?;
        Ok(Self { pool })
    }
}

impl Store for SqliteStore {
    // ── Lifecycle ───────────────────────────────────────────────────

    fn run_migrations(&self) -> Result<(), String> {
        crate::db::run_migrations(&self.pool).map_err(|e| e.to_string())
    }

    // ── Section content ─────────────────────────────────────────────

    fn form_find(&self, shape: Shape, key: &RecordKey) -> Result<Option<FormRecord>, String> {
        FormRecord::find(&self.pool, shape, key)
    }

    fn form_upsert(
        &self,
        shape: Shape,
        key: &RecordKey,
        values: &Value,
    ) -> Result<FormRecord, String> {
        FormRecord::upsert(&self.pool, shape, key, values)
    }

    fn form_delete(&self, shape: Shape, key: &RecordKey) -> Result<bool, String> {
        FormRecord::delete(&self.pool, shape, key)
    }

    fn form_list(&self, subtype: &str) -> Vec<SectionSummary> {
        FormRecord::list_for_subtype(&self.pool, subtype)
    }
}
