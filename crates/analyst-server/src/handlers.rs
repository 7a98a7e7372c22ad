//! HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use analyst_core::{AnalysisReport, AnalystError};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub output_mode: String,
    pub provider_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub asset: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: &AnalystError) -> ApiError {
    let (status, code) = match err {
        AnalystError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        AnalystError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        _ => (StatusCode::BAD_GATEWAY, "ANALYSIS_UNAVAILABLE"),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.analyst.provider();
    let provider_connected = provider.health_check().await.unwrap_or(false);
    let config = state.analyst.config();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: provider.name().to_string(),
        model: config.model.clone(),
        output_mode: config.output_mode.to_string(),
        provider_connected,
    })
}

/// Analyze one asset
pub async fn create_analysis(
    State(state): State<AppState>,
    Json(payload): Json<AnalysisRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("analysis", %request_id, asset = %payload.asset);

    let outcome = state
        .analyst
        .request_analysis(&payload.asset)
        .instrument(span)
        .await;

    match outcome {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            if e.is_validation() {
                tracing::info!("Rejected analysis request: {}", e);
            } else {
                tracing::error!("Analysis error: {}", e);
            }
            Err(api_error(&e))
        }
    }
}
