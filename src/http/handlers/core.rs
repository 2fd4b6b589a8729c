use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::http::SharedState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "School administration backend is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health probe: backend status, store status, and a sample of collection
/// names so a dashboard can show what the store holds.
pub async fn test_database(State(state): State<SharedState>) -> Json<Value> {
    let mut result = json!({
        "backend": "running",
        "database": "not connected",
        "collections": [],
    });

    if let Some(store) = &state.store {
        match store.collection_names(10) {
            Ok(names) => {
                result["database"] = json!("connected");
                result["collections"] = json!(names);
            }
            Err(e) => {
                let msg: String = e.to_string().chars().take(80).collect();
                result["database"] = json!(format!("error: {}", msg));
            }
        }
    }

    Json(result)
}
