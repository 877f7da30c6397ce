//! HTTP route definitions

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    // static download tree of the bucket fixed at startup
    let upgrade = ServeDir::new(&state.serve_root);

    Router::new()
        .route("/fetch", post(handlers::fetch))
        .route("/health", get(handlers::health))
        .nest_service("/upgrade", upgrade)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
