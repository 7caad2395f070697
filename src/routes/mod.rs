use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::{json, Value};

pub mod forms;
pub mod multipart;

pub fn routes() -> Vec<rocket::Route> {
    routes![
        forms::list_get,
        forms::list_create,
        forms::list_update,
        forms::list_delete,
        forms::document_get,
        forms::document_create,
        forms::document_update,
        forms::document_delete,
        forms::sections,
        forms::upload,
    ]
}

pub fn catchers() -> Vec<rocket::Catcher> {
    catchers![not_found, unprocessable, server_error]
}

/// Section content changes under the operator's hands; never let a proxy cache it.
pub struct NoCacheApi;

#[rocket::async_trait]
impl Fairing for NoCacheApi {
    fn info(&self) -> Info {
        Info { name: "No-Cache API", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut rocket::Response<'r>) {
        if req.uri().path().starts_with("/api") {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

#[catch(404)]
fn not_found() -> Json<Value> {
    Json(json!({ "error": "Not found" }))
}

#[catch(422)]
fn unprocessable(req: &Request<'_>) -> Json<Value> {
    Json(json!({ "error": format!("Malformed request body for {}", req.uri().path()) }))
}

#[catch(500)]
fn server_error() -> Json<Value> {
    Json(json!({ "error": "Internal server error" }))
}
