//! # analyst-runtime
//!
//! Generative model providers for market-analyst.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google Gemini `generateContent`, with optional
//!   Google Search grounding and schema-constrained JSON output
//!
//! ## Usage
//!
//! ```rust,ignore
//! use analyst_runtime::gemini::GeminiProvider;
//!
//! let provider = GeminiProvider::from_env()?;
//! let analyst = Analyst::new(Arc::new(provider), AnalystConfig::from_env()?);
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};

// Re-export core types for convenience
pub use analyst_core::{
    AnalysisReport, Analyst, AnalystConfig, AnalystError, LlmProvider, Message, OutputMode,
    Result, Role,
};
