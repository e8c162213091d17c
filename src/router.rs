use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::ExtractionClient;
use crate::db::RecordStore;
use crate::handlers::{hello_handler, static_handler, upload_handler};
use crate::service::UploadService;

/// Shared per-process state. Constructed once in `main` and cloned into each request.
#[derive(Clone)]
pub struct NexusState {
    pub uploads: Arc<UploadService>,
    pub max_upload_bytes: usize,
}

impl NexusState {
    pub fn new(
        store: RecordStore,
        extractor: Arc<dyn ExtractionClient>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            uploads: Arc::new(UploadService::new(store, extractor)),
            max_upload_bytes,
        }
    }
}

pub fn nexus_router(state: NexusState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/hello", get(hello_handler))
        .route("/file/upload", post(upload_handler).layer(upload_limit))
        .fallback(static_handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
