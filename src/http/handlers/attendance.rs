use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use super::list_docs;
use crate::http::error::ApiError;
use crate::http::SharedState;
use crate::schema::{Attendance, Resource};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date_value: Option<String>,
}

/// Upsert keyed on (student_id, date). The store handle is checked before
/// the operation is attempted, never after a partial write.
pub async fn set(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let record =
        Attendance::from_json(&body).map_err(|errs| ApiError::validation(json!(errs)))?;
    let store = state.store()?;

    let outcome = store
        .set_attendance(
            &record.student_id,
            &record.date.to_string(),
            &record.status,
        )
        .map_err(|e| ApiError::db("db_update_failed", e))?;

    Ok(Json(json!({
        "matched": outcome.matched,
        "modified": outcome.modified,
        "upserted_id": outcome.upserted_id,
    })))
}

pub async fn list(
    State(state): State<SharedState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let Some(raw) = q.date_value.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(ApiError::validation(json!([
            { "field": "date_value", "message": "missing" }
        ])));
    };
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ApiError::validation(json!([
            { "field": "date_value", "message": "must be a date in YYYY-MM-DD form" }
        ]))
    })?;

    let filter = [("date", date.to_string())];
    Ok(Json(list_docs(&state, Attendance::COLLECTION, &filter)?))
}
