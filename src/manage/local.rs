use std::sync::Arc;

use log::error;
use serde_json::Value;

use super::api::{ApiError, ContentApi, FileField, PendingFile, WriteMode};
use crate::models::form_data::{FormRecord, RecordKey, Shape};
use crate::store::Store;
use crate::uploads::{apply_upload_urls, UploadDir};

/// In-process `ContentApi` straight over a `Store`, with the same upsert
/// semantics as the HTTP routes. Used by tools running next to the database.
pub struct StoreApi {
    store: Arc<dyn Store>,
    uploads: UploadDir,
}

impl StoreApi {
    pub fn new(store: Arc<dyn Store>, uploads: UploadDir) -> Self {
        StoreApi { store, uploads }
    }
}

impl ContentApi for StoreApi {
    fn fetch(&self, shape: Shape, key: &RecordKey) -> Result<Option<FormRecord>, ApiError> {
        self.store.form_find(shape, key).map_err(|e| {
            error!("Fetch {} {} failed: {}", shape.as_str(), key, e);
            ApiError::new(Some(500), "Error loading")
        })
    }

    fn upsert(
        &self,
        shape: Shape,
        key: &RecordKey,
        values: &Value,
        files: &[FileField],
        mode: WriteMode,
    ) -> Result<FormRecord, ApiError> {
        let failure = match mode {
            WriteMode::Create => "Error saving",
            WriteMode::Replace => "Error updating",
        };
        let mut values = shape.coerce(values.clone());
        if shape == Shape::List {
            let mut urls = Vec::with_capacity(files.len());
            for field in files {
                let url = self
                    .uploads
                    .write_bytes(&field.file.file_name, &field.file.bytes)
                    .map_err(|e| {
                        error!("Upload {} for {} failed: {}", field.field_name(), key, e);
                        ApiError::new(Some(500), failure)
                    })?;
                urls.push((field.index, url));
            }
            apply_upload_urls(&key.record_type, &mut values, &urls);
        }
        self.store.form_upsert(shape, key, &values).map_err(|e| {
            error!("Upsert {} {} failed: {}", shape.as_str(), key, e);
            ApiError::new(Some(500), failure)
        })
    }

    fn delete(&self, shape: Shape, key: &RecordKey) -> Result<(), ApiError> {
        match self.store.form_delete(shape, key) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ApiError::new(Some(404), "Record not found")),
            Err(e) => {
                error!("Delete {} {} failed: {}", shape.as_str(), key, e);
                Err(ApiError::new(Some(500), "Error deleting"))
            }
        }
    }

    fn upload(&self, file: &PendingFile) -> Result<String, ApiError> {
        self.uploads
            .write_bytes(&file.file_name, &file.bytes)
            .map_err(|e| {
                error!("Upload {} failed: {}", file.file_name, e);
                ApiError::new(Some(500), "Error uploading")
            })
    }
}
