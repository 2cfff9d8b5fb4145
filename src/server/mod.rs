pub mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::readers::WorkbookReader;
use crate::store::DatasetStore;
use crate::utils::constants::{INDEX_PAGE, MAX_UPLOAD_BYTES, TEST_PAGE};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DatasetStore>,
    pub reader: Arc<WorkbookReader>,
}

impl AppState {
    pub fn new(store: Arc<dyn DatasetStore>) -> Self {
        Self {
            store,
            reader: Arc::new(WorkbookReader::new()),
        }
    }
}

/// Build the application router: the JSON API plus static serving of the
/// bundled front-end pages. CORS is permissive, matching the upstream
/// deployment.
pub fn router(state: AppState, static_dir: PathBuf) -> Router {
    Router::new()
        .route("/api/upload", post(handlers::upload))
        .route("/api/data", get(handlers::data))
        .route("/api/stats", get(handlers::stats))
        .route("/api/summary", get(handlers::summary))
        .route("/api/delete", post(handlers::delete))
        .route_service("/", ServeFile::new(static_dir.join(INDEX_PAGE)))
        .route_service("/test", ServeFile::new(static_dir.join(TEST_PAGE)))
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
