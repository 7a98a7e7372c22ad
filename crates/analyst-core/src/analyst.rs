//! Analysis Client
//!
//! Turns an asset symbol into a structured analysis by delegating to an
//! `LlmProvider`. One provider call per request; the outcome is
//! all-or-nothing.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AnalystError, Result, EMPTY_SYMBOL_MESSAGE};
use crate::message::Message;
use crate::model::{AnalysisReport, AnalysisResult};
use crate::parse::{extract_sources, parse_analysis};
use crate::prompt;
use crate::provider::{Completion, FinishReason, GenerationOptions, LlmProvider, ResponseFormat};
use crate::query::normalize_symbol;

/// How the model is asked to shape its answer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Schema-constrained JSON; the whole response text is the object
    #[default]
    Schema,

    /// Web search enabled; the object arrives inside a ```json fence
    Grounded,
}

impl OutputMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Grounded => "grounded",
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = AnalystError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "schema" | "json" => Ok(Self::Schema),
            "grounded" | "search" | "fenced" => Ok(Self::Grounded),
            other => Err(AnalystError::Config(format!(
                "unknown output mode '{other}' (expected 'schema' or 'grounded')"
            ))),
        }
    }
}

/// Analyst configuration
#[derive(Clone, Debug)]
pub struct AnalystConfig {
    /// Model identifier sent to the provider
    pub model: String,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Response shape
    pub output_mode: OutputMode,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            model: GenerationOptions::default().model,
            temperature: None,
            output_mode: OutputMode::default(),
        }
    }
}

impl AnalystConfig {
    /// Read `ANALYST_MODEL`, `ANALYST_OUTPUT_MODE` and `ANALYST_TEMPERATURE`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let model = var("ANALYST_MODEL").map_or(defaults.model, |m| m.trim().to_string());

        let output_mode = match var("ANALYST_OUTPUT_MODE") {
            Some(mode) => mode.parse()?,
            None => defaults.output_mode,
        };

        let temperature = match var("ANALYST_TEMPERATURE") {
            Some(t) => {
                let value = t.trim().parse::<f32>().map_err(|e| {
                    AnalystError::Config(format!("invalid ANALYST_TEMPERATURE '{t}': {e}"))
                })?;
                if !(0.0..=2.0).contains(&value) {
                    return Err(AnalystError::Config(format!(
                        "ANALYST_TEMPERATURE must be between 0 and 2, got {value}"
                    )));
                }
                Some(value)
            }
            None => None,
        };

        Ok(Self {
            model,
            temperature,
            output_mode,
        })
    }

    /// Generation options for the configured mode
    pub fn generation_options(&self) -> GenerationOptions {
        let (response_format, web_search) = match self.output_mode {
            OutputMode::Schema => (ResponseFormat::JsonSchema(prompt::analysis_schema()), false),
            OutputMode::Grounded => (ResponseFormat::Text, true),
        };

        GenerationOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            response_format,
            web_search,
        }
    }
}

/// The analysis client
pub struct Analyst {
    provider: Arc<dyn LlmProvider>,
    config: AnalystConfig,
}

impl Analyst {
    /// Create a new analyst
    pub fn new(provider: Arc<dyn LlmProvider>, config: AnalystConfig) -> Self {
        Self { provider, config }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(provider, AnalystConfig::default())
    }

    pub const fn config(&self) -> &AnalystConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Prompt messages for one asset
    pub fn build_messages(&self, asset: &str) -> Vec<Message> {
        vec![
            Message::system(prompt::system_instruction(self.config.output_mode)),
            Message::user(prompt::user_message(asset)),
        ]
    }

    /// Analyze one asset.
    ///
    /// Empty input fails with `Validation` before any provider call. Every
    /// other failure is logged and returned as `AnalysisUnavailable`.
    pub async fn request_analysis(&self, symbol: &str) -> Result<AnalysisReport> {
        let asset = normalize_symbol(symbol);
        if asset.is_empty() {
            return Err(AnalystError::Validation(EMPTY_SYMBOL_MESSAGE.into()));
        }

        let mode = self.config.output_mode;
        tracing::info!(
            asset = %asset,
            model = %self.config.model,
            mode = %mode,
            "requesting analysis"
        );

        let messages = self.build_messages(&asset);
        let options = self.config.generation_options();

        let completion = match self.provider.complete(&messages, &options).await {
            Ok(completion) => completion,
            Err(e) => return Err(Self::unavailable(&asset, &e)),
        };

        match Self::interpret(&asset, mode, &completion) {
            Ok(report) => {
                tracing::info!(
                    asset = %asset,
                    recommendation = %report.analysis.recommendation,
                    sources = report.sources.len(),
                    tokens = ?completion.usage.as_ref().map(|u| u.total_tokens),
                    "analysis ready"
                );
                Ok(report)
            }
            Err(e) => {
                tracing::debug!(
                    asset = %asset,
                    finish_reason = ?completion.finish_reason,
                    raw = %completion.content,
                    "unparsable model output"
                );
                let e = match completion.finish_reason {
                    Some(FinishReason::Length) => {
                        AnalystError::Parse(format!("{e} (response truncated at the token limit)"))
                    }
                    _ => e,
                };
                Err(Self::unavailable(&asset, &e))
            }
        }
    }

    /// Turn a completion into a report
    fn interpret(asset: &str, mode: OutputMode, completion: &Completion) -> Result<AnalysisReport> {
        if completion.content.trim().is_empty() {
            return Err(AnalystError::Parse("empty response from model".into()));
        }

        let mut analysis: AnalysisResult = parse_analysis(&completion.content, mode)?;

        analysis.asset = match normalize_symbol(&analysis.asset) {
            echoed if echoed.is_empty() => asset.to_string(),
            echoed => echoed,
        };

        if !analysis.recommendation.is_recognized() {
            tracing::warn!(
                asset = %asset,
                recommendation = %analysis.recommendation,
                "model returned an unrecognized recommendation"
            );
        }

        let sources = extract_sources(&completion.grounding);
        Ok(AnalysisReport::new(analysis, sources))
    }

    fn unavailable(asset: &str, err: &AnalystError) -> AnalystError {
        tracing::error!(asset = %asset, error = %err, "analysis request failed");
        AnalystError::AnalysisUnavailable(err.to_string())
    }
}
