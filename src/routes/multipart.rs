use rocket::form::{self, DataField, FromForm, FromFormField, Options, ValueField};
use rocket::fs::TempFile;

use crate::uploads::parse_upload_field;

/// Multipart body of a section upsert: a JSON `values` field plus any number of
/// indexed file fields (`file{i}` / `video{i}`). Field names are dynamic, so this
/// implements `FromForm` by hand instead of deriving it.
pub struct UpsertForm<'r> {
    pub values: Option<String>,
    pub files: Vec<(usize, TempFile<'r>)>,
}

pub struct UpsertContext<'r> {
    values: Option<String>,
    files: Vec<(usize, TempFile<'r>)>,
    error: Option<form::Errors<'r>>,
}

#[rocket::async_trait]
impl<'r> FromForm<'r> for UpsertForm<'r> {
    type Context = UpsertContext<'r>;

    fn init(_opts: Options) -> Self::Context {
        UpsertContext {
            values: None,
            files: Vec::new(),
            error: None,
        }
    }

    fn push_value(ctxt: &mut Self::Context, field: ValueField<'r>) {
        // `id` is sent by older clients alongside `values`; the key is the route.
        if field.name.source().as_str() == "values" {
            ctxt.values = Some(field.value.to_string());
        }
    }

    async fn push_data(ctxt: &mut Self::Context, field: DataField<'r, '_>) {
        let is_values = field.name.source().as_str() == "values";
        let index = parse_upload_field(field.name.source().as_str());
        if is_values {
            match <String as FromFormField<'r>>::from_data(field).await {
                Ok(v) => ctxt.values = Some(v),
                Err(e) => record_error(ctxt, e),
            }
            return;
        }
        let Some(index) = index else {
            return;
        };
        match <TempFile<'r> as FromFormField<'r>>::from_data(field).await {
            Ok(file) if file.len() > 0 => ctxt.files.push((index, file)),
            Ok(_) => {}
            Err(e) => record_error(ctxt, e),
        }
    }

    fn finalize(ctxt: Self::Context) -> form::Result<'r, Self> {
        if let Some(errors) = ctxt.error {
            return Err(errors);
        }
        let mut files = ctxt.files;
        files.sort_by_key(|(index, _)| *index);
        Ok(UpsertForm {
            values: ctxt.values,
            files,
        })
    }
}

fn record_error<'r>(ctxt: &mut UpsertContext<'r>, errors: form::Errors<'r>) {
    if ctxt.error.is_none() {
        ctxt.error = Some(errors);
    }
}

#[derive(FromForm)]
pub struct UploadForm<'r> {
    pub file: TempFile<'r>,
}
