//! API Client

use analyst_core::{AnalysisReport, AnalystError};
use serde::Deserialize;

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

/// Absolute URL for a server path; reqwest on WASM needs a full URL
fn endpoint(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{origin}{path}")
}

fn unavailable(detail: String) -> AnalystError {
    leptos::logging::error!("Analysis request failed: {}", detail);
    AnalystError::AnalysisUnavailable(detail)
}

/// Request an analysis for one asset. Exactly one HTTP call.
pub async fn request_analysis(asset: &str) -> Result<AnalysisReport, AnalystError> {
    let client = reqwest::Client::new();

    let response = client
        .post(endpoint("/api/analysis"))
        .json(&serde_json::json!({ "asset": asset }))
        .send()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return response
            .json::<AnalysisReport>()
            .await
            .map_err(|e| unavailable(format!("invalid analysis body: {e}")));
    }

    match response.json::<ErrorResponse>().await {
        Ok(body) if body.code == "VALIDATION_ERROR" => Err(AnalystError::Validation(body.error)),
        Ok(body) => Err(unavailable(format!("{status} {}: {}", body.code, body.error))),
        Err(_) => Err(unavailable(status.to_string())),
    }
}
