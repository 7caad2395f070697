use log::warn;
use rocket::data::{Limits, ToByteUnit};
use rocket::figment::providers::Env;
use rocket::figment::Figment;
use serde::{Deserialize, Serialize};

/// Server settings. Read from `Rocket.toml` / `ROCKET_*` and overridden by
/// `FORMDESK_*` environment variables; every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: String,
    pub pool_size: u32,
    /// Directory uploaded files are written to.
    pub upload_dir: String,
    /// URL prefix the upload directory is served under.
    pub public_upload_base: String,
    pub max_upload_mb: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: "website/db/formdesk.db".to_string(),
            pool_size: 10,
            upload_dir: "website/uploads".to_string(),
            public_upload_base: "/uploads".to_string(),
            max_upload_mb: 50,
        }
    }
}

impl AppConfig {
    /// Rocket's own figment with the `FORMDESK_` environment layered on top.
    pub fn figment() -> Figment {
        rocket::Config::figment().merge(Env::prefixed("FORMDESK_").global())
    }

    pub fn from_figment(figment: &Figment) -> Self {
        figment.extract().unwrap_or_else(|e| {
            warn!("Invalid formdesk configuration ({}), using defaults", e);
            AppConfig::default()
        })
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.max(1) * 1024 * 1024
    }

    /// Data limits large enough for multipart submits carrying videos.
    pub fn limits(&self) -> Limits {
        let bytes = self.max_upload_bytes().bytes();
        Limits::default()
            .limit("file", bytes)
            .limit("data-form", bytes)
            .limit("form", 1.mebibytes())
            .limit("string", 1.mebibytes())
    }
}
