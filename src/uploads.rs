use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use rocket::fs::TempFile;
use serde_json::Value;

use crate::config::AppConfig;

/// Where uploaded files land on disk and the URL prefix they are served under.
#[derive(Debug, Clone)]
pub struct UploadDir {
    pub root: PathBuf,
    pub public_base: String,
    pub max_bytes: u64,
}

impl UploadDir {
    pub fn from_config(config: &AppConfig) -> Self {
        UploadDir {
            root: PathBuf::from(&config.upload_dir),
            public_base: config.public_upload_base.trim_end_matches('/').to_string(),
            max_bytes: config.max_upload_bytes(),
        }
    }

    pub fn public_url(&self, stored: &str) -> String {
        format!("{}/{}", self.public_base, stored)
    }

    /// Persist a multipart file and return its public URL.
    pub async fn persist(&self, file: &mut TempFile<'_>) -> Result<String, String> {
        if file.len() > self.max_bytes {
            return Err(format!("file exceeds {} bytes", self.max_bytes));
        }
        let original = file
            .raw_name()
            .map(|rn| rn.dangerous_unsafe_unsanitized_raw().as_str().to_string())
            .or_else(|| file.name().map(|n| n.to_string()))
            .unwrap_or_else(|| "upload".to_string());
        let ext_hint = file
            .content_type()
            .and_then(|ct| ct.extension())
            .map(|e| e.to_string());
        let stored = stored_name(&original, ext_hint.as_deref());

        fs::create_dir_all(&self.root).map_err(|e| e.to_string())?;
        let dest = self.root.join(&stored);
        file.move_copy_to(&dest).await.map_err(|e| e.to_string())?;
        info!("Stored upload {} as {}", original, stored);
        Ok(self.public_url(&stored))
    }

    /// Persist raw bytes (in-process uploads) and return the public URL.
    pub fn write_bytes(&self, original: &str, bytes: &[u8]) -> Result<String, String> {
        if bytes.len() as u64 > self.max_bytes {
            return Err(format!("file exceeds {} bytes", self.max_bytes));
        }
        let stored = stored_name(original, None);
        fs::create_dir_all(&self.root).map_err(|e| e.to_string())?;
        fs::write(self.root.join(&stored), bytes).map_err(|e| e.to_string())?;
        Ok(self.public_url(&stored))
    }
}

/// `<millis>-<slugified stem>.<ext>`; the timestamp prefix keeps names unique per upload.
pub fn stored_name(original: &str, ext_hint: Option<&str>) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(slug::slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .or_else(|| ext_hint.map(|e| e.to_lowercase()))
        .unwrap_or_else(|| "bin".to_string());
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{}-{}.{}", millis, stem, ext)
}

/// Multipart field name → index of the list element it belongs to.
/// Accepts `file{i}` and `video{i}`.
pub fn parse_upload_field(name: &str) -> Option<usize> {
    let digits = name
        .strip_prefix("file")
        .or_else(|| name.strip_prefix("video"))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// The element field an uploaded file's URL is written to.
pub fn url_field_for(record_type: &str) -> &'static str {
    if record_type == "highlights" {
        "video"
    } else {
        "image"
    }
}

/// Write each `(index, url)` into the matching array element. Indices past the
/// end and non-object elements are skipped.
pub fn apply_upload_urls(record_type: &str, values: &mut Value, urls: &[(usize, String)]) {
    let field = url_field_for(record_type);
    let Some(items) = values.as_array_mut() else {
        return;
    };
    for (index, url) in urls {
        if let Some(Value::Object(obj)) = items.get_mut(*index) {
            obj.insert(field.to_string(), Value::String(url.clone()));
        }
    }
}
