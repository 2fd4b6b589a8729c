use axum::extract::State;
use axum::Json;
use serde_json::Value;

use super::{create_doc, list_docs};
use crate::http::error::ApiError;
use crate::http::SharedState;
use crate::schema::{Circular, Event, Resource};

pub async fn create_circular(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    Ok(Json(create_doc::<Circular>(store, &body)?))
}

pub async fn list_circulars(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(list_docs(&state, Circular::COLLECTION, &[])?))
}

pub async fn create_event(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    Ok(Json(create_doc::<Event>(store, &body)?))
}

pub async fn list_events(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(list_docs(&state, Event::COLLECTION, &[])?))
}
