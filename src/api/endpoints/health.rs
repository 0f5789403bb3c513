//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::config::{APP_NAME, APP_VERSION};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub retrieval: &'static str,
    pub extraction: String,
}

/// `GET /` and `GET /health`: liveness plus the configured strategies.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: APP_NAME,
        version: APP_VERSION,
        retrieval: ctx.engine.retrieval_strategy().as_str(),
        extraction: ctx.extractor.describe(),
    })
}
