use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde_json::Value;

use super::api::{ApiError, ContentApi, FileField, PendingFile, WriteMode};
use crate::models::form_data::{FormRecord, RecordKey, Shape};

/// `ContentApi` over the service's HTTP routes.
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ApiError::new(None, format!("HTTP client error: {}", e)))?;
        Ok(HttpApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn record_url(&self, shape: Shape, key: &RecordKey) -> String {
        format!(
            "{}/api/{}/{}/{}",
            self.base_url,
            key.subtype,
            shape.route_segment(),
            key.record_type
        )
    }

    fn send(&self, req: RequestBuilder) -> Result<Value, ApiError> {
        let resp = req.send().map_err(ApiError::transport)?;
        read_json(resp)
    }
}

fn read_json(resp: Response) -> Result<Value, ApiError> {
    let status = resp.status();
    let text = resp.text().map_err(ApiError::transport)?;
    let body: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) if status.is_success() => return Err(ApiError::transport(e)),
            Err(_) => Value::Null,
        }
    };
    if !status.is_success() {
        return Err(ApiError::from_body(status.as_u16(), &body));
    }
    Ok(body)
}

fn file_part(file: &PendingFile) -> Result<multipart::Part, ApiError> {
    let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    match &file.content_type {
        Some(ct) => part.mime_str(ct).map_err(ApiError::transport),
        None => Ok(part),
    }
}

fn to_record(body: Value) -> Result<FormRecord, ApiError> {
    serde_json::from_value(body).map_err(ApiError::transport)
}

impl ContentApi for HttpApi {
    fn fetch(&self, shape: Shape, key: &RecordKey) -> Result<Option<FormRecord>, ApiError> {
        let body = self.send(self.client.get(self.record_url(shape, key)))?;
        if body.is_null() {
            return Ok(None);
        }
        to_record(body).map(Some)
    }

    fn upsert(
        &self,
        shape: Shape,
        key: &RecordKey,
        values: &Value,
        files: &[FileField],
        mode: WriteMode,
    ) -> Result<FormRecord, ApiError> {
        let mut form = multipart::Form::new().text("values", values.to_string());
        for field in files {
            form = form.part(field.field_name(), file_part(&field.file)?);
        }
        let url = self.record_url(shape, key);
        let req = match mode {
            WriteMode::Create => self.client.post(url),
            WriteMode::Replace => self.client.put(url),
        };
        to_record(self.send(req.multipart(form))?)
    }

    fn delete(&self, shape: Shape, key: &RecordKey) -> Result<(), ApiError> {
        self.send(self.client.delete(self.record_url(shape, key)))
            .map(|_| ())
    }

    fn upload(&self, file: &PendingFile) -> Result<String, ApiError> {
        let form = multipart::Form::new().part("file", file_part(file)?);
        let url = format!("{}/api/upload", self.base_url);
        let body = self.send(self.client.post(url).multipart(form))?;
        body.get("url")
            .and_then(|u| u.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ApiError::transport("upload response without url"))
    }
}
