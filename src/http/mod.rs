pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::http::error::ApiError;
use crate::store::DocStore;

/// Shared request state. `store` is `None` when the backing store could not
/// be opened at startup: writes then fail with `storage_unavailable` and
/// lists return empty, but the server itself keeps answering.
pub struct AppState {
    pub config: Config,
    pub store: Option<DocStore>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn store(&self) -> Result<&DocStore, ApiError> {
        self.store.as_ref().ok_or_else(ApiError::storage_unavailable)
    }
}

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::core::root))
        .route("/test", get(handlers::core::test_database))
        .route(
            "/api/students",
            post(handlers::students::create).get(handlers::students::list),
        )
        .route("/api/students/bulk", post(handlers::students::create_bulk))
        .route(
            "/api/notes",
            post(handlers::materials::create_note).get(handlers::materials::list_notes),
        )
        .route(
            "/api/assignments",
            post(handlers::materials::create_assignment)
                .get(handlers::materials::list_assignments),
        )
        .route(
            "/api/worksheets",
            post(handlers::materials::create_worksheet).get(handlers::materials::list_worksheets),
        )
        .route(
            "/api/circulars",
            post(handlers::announcements::create_circular)
                .get(handlers::announcements::list_circulars),
        )
        .route(
            "/api/events",
            post(handlers::announcements::create_event).get(handlers::announcements::list_events),
        )
        .route("/api/attendance/set", post(handlers::attendance::set))
        .route("/api/attendance", get(handlers::attendance::list))
        .route("/api/upload", post(handlers::uploads::upload))
        .route("/api/uploads", get(handlers::uploads::list))
        .layer(cors)
        .with_state(state)
}
