pub mod announcements;
pub mod attendance;
pub mod core;
pub mod materials;
pub mod students;
pub mod uploads;

use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::AppState;
use crate::schema::Resource;
use crate::store::DocStore;

/// Validates a request body as `T` and inserts it into `T`'s collection.
/// Returns the `{"_id": ...}` response object.
pub(crate) fn create_doc<T: Resource>(store: &DocStore, body: &Value) -> Result<Value, ApiError> {
    let record = T::from_json(body).map_err(|errs| ApiError::validation(json!(errs)))?;
    let doc = encode(&record)?;
    let id = store
        .create(T::COLLECTION, &doc)
        .map_err(|e| ApiError::db("db_insert_failed", e))?;
    Ok(json!({ "_id": id }))
}

/// Lists a collection through the optional store handle. An unavailable
/// store yields an empty list, never an error.
pub(crate) fn list_docs(
    state: &AppState,
    collection: &str,
    filter: &[(&str, String)],
) -> Result<Value, ApiError> {
    let Some(store) = state.store.as_ref() else {
        return Ok(json!([]));
    };
    let docs = store
        .list(collection, filter)
        .map_err(|e| ApiError::db("db_query_failed", e))?;
    Ok(Value::Array(docs))
}

pub(crate) fn encode<T: serde::Serialize>(record: &T) -> Result<Value, ApiError> {
    serde_json::to_value(record).map_err(|e| ApiError::db("db_insert_failed", e))
}

/// Empty query values count as absent, so `?class_name=` lists everything.
pub(crate) fn filter_param(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
