use serde_json::Value;

use crate::models::form_data::{FormRecord, RecordKey, SectionSummary, Shape};

pub mod sqlite;

/// Unified data-access trait. Every section read/write goes through here.
/// Implementation: `SqliteStore` (wraps rusqlite/r2d2).
pub trait Store: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────────
    fn run_migrations(&self) -> Result<(), String>;

    // ── Section content ─────────────────────────────────────────────
    fn form_find(&self, shape: Shape, key: &RecordKey) -> Result<Option<FormRecord>, String>;
    fn form_upsert(&self, shape: Shape, key: &RecordKey, values: &Value)
        -> Result<FormRecord, String>;
    fn form_delete(&self, shape: Shape, key: &RecordKey) -> Result<bool, String>;
    fn form_list(&self, subtype: &str) -> Vec<SectionSummary>;
}
