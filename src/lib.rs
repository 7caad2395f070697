#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::figment::Figment;
use rocket::fs::FileServer;
use rocket::{Build, Rocket};

pub mod boot;
pub mod config;
pub mod db;
pub mod manage;
pub mod models;
pub mod pages;
pub mod routes;
pub mod store;
pub mod uploads;

#[cfg(test)]
mod tests;

use config::AppConfig;
use store::Store;
use uploads::UploadDir;

/// Assemble the service: API routes under `/api`, uploaded files under the
/// public upload base, JSON error catchers.
pub fn build(figment: Figment, config: &AppConfig, store: Arc<dyn Store>) -> Rocket<Build> {
    let uploads = UploadDir::from_config(config);
    let upload_mount = uploads.public_base.clone();
    let upload_root = uploads.root.clone();
    let figment = figment.merge(("limits", config.limits()));
    // the file server refuses to mount a missing directory
    if let Err(e) = std::fs::create_dir_all(&upload_root) {
        log::warn!("Could not create {}: {}", upload_root.display(), e);
    }

    rocket::custom(figment)
        .manage(store)
        .manage(uploads)
        .attach(routes::NoCacheApi)
        .mount("/api", routes::routes())
        .mount(
            if upload_mount.is_empty() { "/" } else { upload_mount.as_str() },
            FileServer::from(upload_root),
        )
        .register("/", routes::catchers())
}
