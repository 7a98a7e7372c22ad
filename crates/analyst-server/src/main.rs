//! market-analyst HTTP Server
//!
//! Axum-based server exposing the analysis API and serving the compiled
//! Leptos frontend. The Gemini credential never leaves this process.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use analyst_core::{Analyst, AnalystConfig, LlmProvider};
use analyst_runtime::GeminiProvider;

use crate::handlers::{create_analysis, health_check};
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let index = format!("{}/index.html", static_dir.trim_end_matches('/'));
    let frontend = ServeDir::new(static_dir).not_found_service(ServeFile::new(index));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/analysis", post(create_analysis))
        .fallback_service(frontend)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing credential or bad settings abort startup
    let provider = GeminiProvider::from_env().inspect_err(|e| {
        tracing::error!("✗ {}", e);
        tracing::error!("  Set GEMINI_API_KEY in the environment or .env");
    })?;
    let config = AnalystConfig::from_env()?;

    if provider.health_check().await.unwrap_or(false) {
        tracing::info!("✓ Connected to Gemini");
    } else {
        tracing::warn!("⚠ Gemini not reachable - analyses will fail until it is");
    }

    tracing::info!("  Model: {}", config.model);
    tracing::info!("  Output mode: {}", config.output_mode);

    let state = AppState::new(Analyst::new(Arc::new(provider), config));

    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into());
    let app = router(state, &static_dir);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 market-analyst running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health        - Health check");
    tracing::info!("  POST /api/analysis  - Analyze an asset");
    tracing::info!("  GET  /              - Web frontend ({})", static_dir);
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
