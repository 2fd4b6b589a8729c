use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{create_doc, encode, filter_param, list_docs};
use crate::http::error::ApiError;
use crate::http::SharedState;
use crate::schema::{Resource, Student};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub class_name: Option<String>,
}

pub async fn create(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    Ok(Json(create_doc::<Student>(store, &body)?))
}

/// Bulk insert. The whole batch is validated up front and written in one
/// transaction, so a bad entry or a failed insert leaves nothing behind.
pub async fn create_bulk(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Some(entries) = body.get("students").and_then(|v| v.as_array()) else {
        return Err(ApiError::validation(json!([
            { "field": "students", "message": "missing or not an array" }
        ])));
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut bad = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match Student::from_json(entry) {
            Ok(s) => records.push(s),
            Err(errs) => bad.push(json!({ "index": index, "errors": errs })),
        }
    }
    if !bad.is_empty() {
        return Err(ApiError::validation(Value::Array(bad)));
    }

    let store = state.store()?;
    let docs = records
        .iter()
        .map(encode)
        .collect::<Result<Vec<_>, _>>()?;
    let ids = store
        .create_many(Student::COLLECTION, &docs)
        .map_err(|e| ApiError::db("db_tx_failed", e))?;
    Ok(Json(json!({ "inserted": ids })))
}

pub async fn list(
    State(state): State<SharedState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut filter = Vec::new();
    if let Some(class_name) = filter_param(&q.class_name) {
        filter.push(("class_name", class_name));
    }
    Ok(Json(list_docs(&state, Student::COLLECTION, &filter)?))
}
