//! API router.
//!
//! Layers (outermost → innermost): CORS → request logging → handler.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(endpoints::health::check))
        .route("/health", get(endpoints::health::check))
        .route("/analyze", post(endpoints::analyze::analyze))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::logging::log_request))
        .layer(CorsLayer::permissive())
}
