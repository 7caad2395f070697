use serde_json::Value;

use super::records::UploadSlot;
use crate::models::form_data::{FormRecord, RecordKey, Shape};

/// Fallback shown when the server gave no usable `error` message.
pub const GENERIC_ERROR: &str = "Something went wrong, please try again";

/// A file picked by the operator that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    pub fn new(file_name: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        PendingFile {
            file_name: file_name.to_string(),
            content_type: content_type.map(|s| s.to_string()),
            bytes,
        }
    }
}

/// One indexed file field of a list upsert: `file{index}` or `video{index}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileField {
    pub index: usize,
    pub slot: UploadSlot,
    pub file: PendingFile,
}

impl FileField {
    pub fn field_name(&self) -> String {
        self.slot.field_name(self.index)
    }
}

/// POST when the record does not exist yet, PUT when it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Replace,
}

impl WriteMode {
    pub fn for_existing(exists: bool) -> Self {
        if exists {
            WriteMode::Replace
        } else {
            WriteMode::Create
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status when the failure came from a response.
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    /// Build from an error response body, preferring its `error` string.
    pub fn from_body(status: u16, body: &Value) -> Self {
        let message = body
            .get("error")
            .and_then(|e| e.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(GENERIC_ERROR);
        ApiError::new(Some(status), message)
    }

    pub fn transport(detail: impl std::fmt::Display) -> Self {
        log::error!("Request failed: {}", detail);
        ApiError::new(None, GENERIC_ERROR)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// The record store as seen by the form managers.
pub trait ContentApi {
    /// `Ok(None)` when nothing is stored under `key`.
    fn fetch(&self, shape: Shape, key: &RecordKey) -> Result<Option<FormRecord>, ApiError>;

    fn upsert(
        &self,
        shape: Shape,
        key: &RecordKey,
        values: &Value,
        files: &[FileField],
        mode: WriteMode,
    ) -> Result<FormRecord, ApiError>;

    fn delete(&self, shape: Shape, key: &RecordKey) -> Result<(), ApiError>;

    /// Upload side channel; returns the public URL of the stored file.
    fn upload(&self, file: &PendingFile) -> Result<String, ApiError>;
}
