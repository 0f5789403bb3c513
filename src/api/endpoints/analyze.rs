//! Symptom analysis endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::formatter::{format_triage_result, AnalysisResponse};
use crate::api::types::{AnalyzeRequest, ApiContext};

/// `POST /analyze`: extract symptoms from free text and triage them.
///
/// The pipeline is blocking (LLM and embedding calls), so it runs on the
/// blocking pool.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    request.validate()?;

    let result = tokio::task::spawn_blocking(move || {
        ctx.engine.analyze(
            ctx.extractor.as_ref(),
            &request.text,
            request.vitals.as_ref(),
            &request.medications,
            &request.existing_conditions,
        )
    })
    .await
    .map_err(|e| ApiError::Internal(format!("analysis task failed: {e}")))?;

    Ok(Json(format_triage_result(&result)))
}
