use std::sync::Arc;

use log::error;
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use super::multipart::{UploadForm, UpsertForm};
use crate::models::form_data::{RecordKey, Shape};
use crate::store::Store;
use crate::uploads::{apply_upload_urls, UploadDir};

pub type ApiResult = Result<Json<Value>, status::Custom<Json<Value>>>;

pub(crate) fn api_error(status: Status, message: &str) -> status::Custom<Json<Value>> {
    status::Custom(status, Json(json!({ "error": message })))
}

/// Shared body of POST and PUT on both route families.
async fn handle_upsert(
    store: &dyn Store,
    uploads: &UploadDir,
    shape: Shape,
    key: RecordKey,
    form: UpsertForm<'_>,
    failure: &str,
) -> ApiResult {
    let UpsertForm { values, mut files } = form;
    let raw = match values.as_deref() {
        Some(s) if !s.trim().is_empty() => match serde_json::from_str::<Value>(s) {
            Ok(v) => v,
            Err(e) => {
                return Err(api_error(
                    Status::BadRequest,
                    &format!("values is not valid JSON: {}", e),
                ))
            }
        },
        _ => Value::Null,
    };
    let mut values = shape.coerce(raw);

    if shape == Shape::List {
        let mut urls = Vec::with_capacity(files.len());
        for (index, file) in files.iter_mut() {
            match uploads.persist(file).await {
                Ok(url) => urls.push((*index, url)),
                Err(e) => {
                    error!("Upload {} for {} failed: {}", index, key, e);
                    return Err(api_error(Status::InternalServerError, failure));
                }
            }
        }
        apply_upload_urls(&key.record_type, &mut values, &urls);
    }

    match store.form_upsert(shape, &key, &values) {
        Ok(record) => Ok(Json(serde_json::to_value(record).unwrap_or_default())),
        Err(e) => {
            error!("Upsert {} {} failed: {}", shape.as_str(), key, e);
            Err(api_error(Status::InternalServerError, failure))
        }
    }
}

fn handle_get(store: &dyn Store, shape: Shape, key: RecordKey) -> ApiResult {
    match store.form_find(shape, &key) {
        Ok(Some(record)) => Ok(Json(serde_json::to_value(record).unwrap_or_default())),
        Ok(None) => Ok(Json(Value::Null)),
        Err(e) => {
            error!("Fetch {} {} failed: {}", shape.as_str(), key, e);
            Err(api_error(Status::InternalServerError, "Error loading"))
        }
    }
}

fn handle_delete(store: &dyn Store, shape: Shape, key: RecordKey) -> ApiResult {
    match store.form_delete(shape, &key) {
        Ok(true) => Ok(Json(json!({ "success": true }))),
        Ok(false) => Err(api_error(Status::NotFound, "Record not found")),
        Err(e) => {
            error!("Delete {} {} failed: {}", shape.as_str(), key, e);
            Err(api_error(Status::InternalServerError, "Error deleting"))
        }
    }
}

// ── List records: /api/<subtype>/form/<type> ──────────────

#[get("/<subtype>/form/<record_type>")]
pub fn list_get(store: &State<Arc<dyn Store>>, subtype: &str, record_type: &str) -> ApiResult {
    handle_get(store.inner().as_ref(), Shape::List, RecordKey::new(record_type, subtype))
}

#[post("/<subtype>/form/<record_type>", data = "<form>")]
pub async fn list_create(
    store: &State<Arc<dyn Store>>,
    uploads: &State<UploadDir>,
    subtype: &str,
    record_type: &str,
    form: Form<UpsertForm<'_>>,
) -> ApiResult {
    let key = RecordKey::new(record_type, subtype);
    handle_upsert(store.inner().as_ref(), uploads, Shape::List, key, form.into_inner(), "Error saving").await
}

#[put("/<subtype>/form/<record_type>", data = "<form>")]
pub async fn list_update(
    store: &State<Arc<dyn Store>>,
    uploads: &State<UploadDir>,
    subtype: &str,
    record_type: &str,
    form: Form<UpsertForm<'_>>,
) -> ApiResult {
    let key = RecordKey::new(record_type, subtype);
    handle_upsert(store.inner().as_ref(), uploads, Shape::List, key, form.into_inner(), "Error updating").await
}

#[delete("/<subtype>/form/<record_type>")]
pub fn list_delete(store: &State<Arc<dyn Store>>, subtype: &str, record_type: &str) -> ApiResult {
    handle_delete(store.inner().as_ref(), Shape::List, RecordKey::new(record_type, subtype))
}

// ── Documents: /api/<subtype>/json/<type> ─────────────────

#[get("/<subtype>/json/<record_type>")]
pub fn document_get(store: &State<Arc<dyn Store>>, subtype: &str, record_type: &str) -> ApiResult {
    handle_get(store.inner().as_ref(), Shape::Document, RecordKey::new(record_type, subtype))
}

#[post("/<subtype>/json/<record_type>", data = "<form>")]
pub async fn document_create(
    store: &State<Arc<dyn Store>>,
    uploads: &State<UploadDir>,
    subtype: &str,
    record_type: &str,
    form: Form<UpsertForm<'_>>,
) -> ApiResult {
    let key = RecordKey::new(record_type, subtype);
    handle_upsert(store.inner().as_ref(), uploads, Shape::Document, key, form.into_inner(), "Error saving").await
}

#[put("/<subtype>/json/<record_type>", data = "<form>")]
pub async fn document_update(
    store: &State<Arc<dyn Store>>,
    uploads: &State<UploadDir>,
    subtype: &str,
    record_type: &str,
    form: Form<UpsertForm<'_>>,
) -> ApiResult {
    let key = RecordKey::new(record_type, subtype);
    handle_upsert(store.inner().as_ref(), uploads, Shape::Document, key, form.into_inner(), "Error updating").await
}

#[delete("/<subtype>/json/<record_type>")]
pub fn document_delete(store: &State<Arc<dyn Store>>, subtype: &str, record_type: &str) -> ApiResult {
    handle_delete(store.inner().as_ref(), Shape::Document, RecordKey::new(record_type, subtype))
}

// ── Site overview & upload side channel ───────────────────

#[get("/<subtype>/sections")]
pub fn sections(store: &State<Arc<dyn Store>>, subtype: &str) -> Json<Value> {
    let data = store.form_list(subtype);
    Json(serde_json::to_value(data).unwrap_or_default())
}

#[post("/upload", data = "<form>")]
pub async fn upload(uploads: &State<UploadDir>, form: Form<UploadForm<'_>>) -> ApiResult {
    let mut form = form.into_inner();
    match uploads.persist(&mut form.file).await {
        Ok(url) => Ok(Json(json!({ "url": url }))),
        Err(e) => {
            error!("Upload failed: {}", e);
            Err(api_error(Status::InternalServerError, "Error uploading"))
        }
    }
}
