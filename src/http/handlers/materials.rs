//! Class material routes: notes, assignments, and worksheets all share the
//! same create/list shape with class and subject filters.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::{create_doc, filter_param, list_docs};
use crate::http::error::ApiError;
use crate::http::SharedState;
use crate::schema::{Assignment, Note, Resource, Worksheet};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub class_name: Option<String>,
    pub subject: Option<String>,
}

fn material_filter(q: &ListQuery) -> Vec<(&'static str, String)> {
    let mut filter = Vec::new();
    if let Some(class_name) = filter_param(&q.class_name) {
        filter.push(("class_name", class_name));
    }
    if let Some(subject) = filter_param(&q.subject) {
        filter.push(("subject", subject));
    }
    filter
}

pub async fn create_note(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    Ok(Json(create_doc::<Note>(store, &body)?))
}

pub async fn list_notes(
    State(state): State<SharedState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(list_docs(&state, Note::COLLECTION, &material_filter(&q))?))
}

pub async fn create_assignment(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    Ok(Json(create_doc::<Assignment>(store, &body)?))
}

pub async fn list_assignments(
    State(state): State<SharedState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(list_docs(
        &state,
        Assignment::COLLECTION,
        &material_filter(&q),
    )?))
}

pub async fn create_worksheet(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    Ok(Json(create_doc::<Worksheet>(store, &body)?))
}

pub async fn list_worksheets(
    State(state): State<SharedState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(list_docs(
        &state,
        Worksheet::COLLECTION,
        &material_filter(&q),
    )?))
}
