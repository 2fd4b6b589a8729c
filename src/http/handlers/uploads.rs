use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{encode, filter_param, list_docs};
use crate::http::error::ApiError;
use crate::http::SharedState;
use crate::schema::Upload;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub class_name: Option<String>,
    pub subject: Option<String>,
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::validation(json!([{ "field": "body", "message": e.to_string() }]))
}

// Only the final path component of the client-supplied name is used, so a
// name like "../x" cannot escape the upload directory.
fn safe_filename(raw: &str) -> Option<String> {
    let name = std::path::Path::new(raw).file_name()?.to_str()?;
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

pub async fn upload(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut file: Option<(String, axum::body::Bytes)> = None;
    let mut uploaded_by: Option<String> = None;
    let mut subject: Option<String> = None;
    let mut class_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let raw_name = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                file = Some((raw_name, bytes));
            }
            Some("uploaded_by") => uploaded_by = Some(field.text().await.map_err(bad_multipart)?),
            Some("subject") => subject = Some(field.text().await.map_err(bad_multipart)?),
            Some("class_name") => class_name = Some(field.text().await.map_err(bad_multipart)?),
            _ => {}
        }
    }

    let mut errs: Vec<Value> = Vec::new();
    let filename = match &file {
        None => {
            errs.push(json!({ "field": "file", "message": "missing" }));
            None
        }
        Some((raw_name, _)) => match safe_filename(raw_name) {
            Some(n) => Some(n),
            None => {
                errs.push(json!({ "field": "file", "message": "filename is empty or unsafe" }));
                None
            }
        },
    };
    let uploaded_by = filter_param(&uploaded_by);
    if uploaded_by.is_none() {
        errs.push(json!({ "field": "uploaded_by", "message": "missing" }));
    }
    if !errs.is_empty() {
        return Err(ApiError::validation(Value::Array(errs)));
    }

    let store = state.store()?;
    let filename = filename.unwrap_or_default();
    let bytes = file.map(|(_, b)| b).unwrap_or_default();

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(ApiError::upload)?;
    let dest = state.config.upload_dir.join(&filename);
    tokio::fs::write(&dest, &bytes).await.map_err(ApiError::upload)?;
    let path = dest.to_string_lossy().to_string();

    let record = Upload {
        filename: filename.clone(),
        path: path.clone(),
        uploaded_by: uploaded_by.unwrap_or_default(),
        subject: filter_param(&subject),
        class_name: filter_param(&class_name),
    };
    let id = store
        .create(Upload::COLLECTION, &encode(&record)?)
        .map_err(|e| ApiError::db("db_insert_failed", e))?;

    Ok(Json(json!({ "_id": id, "filename": filename, "path": path })))
}

pub async fn list(
    State(state): State<SharedState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut filter = Vec::new();
    if let Some(class_name) = filter_param(&q.class_name) {
        filter.push(("class_name", class_name));
    }
    if let Some(subject) = filter_param(&q.subject) {
        filter.push(("subject", subject));
    }
    Ok(Json(list_docs(&state, Upload::COLLECTION, &filter)?))
}
