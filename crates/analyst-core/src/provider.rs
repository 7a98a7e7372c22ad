//! LLM Provider Strategy Pattern
//!
//! Defines the narrow interface the analyst uses to reach a generative model.
//! Nothing above this trait assumes anything about the model beyond the
//! response contract: a text payload plus optional grounding chunks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use analyst_core::provider::{GenerationOptions, LlmProvider};
//!
//! let provider = GeminiProvider::from_env()?;
//! let completion = provider.complete(&messages, &options).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;

/// Output contract requested from the model
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "schema", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text; the caller extracts structure itself
    #[default]
    Text,

    /// JSON constrained to the given schema
    JsonSchema(serde_json::Value),
}

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,

    /// Temperature for sampling; `None` leaves the provider default
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Requested output contract
    #[serde(default)]
    pub response_format: ResponseFormat,

    /// Let the model ground its answer with a web search
    #[serde(default)]
    pub web_search: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            temperature: None,
            response_format: ResponseFormat::Text,
            web_search: false,
        }
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text (empty when the model produced nothing)
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,

    /// Citations attached by the retrieval step, in provider order
    #[serde(default)]
    pub grounding: Vec<GroundingChunk>,
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Error,
}

/// One grounding chunk; only web references are consumed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebReference>,
}

/// A web page the model cited
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebReference {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl GroundingChunk {
    /// Convenience constructor for a web citation
    pub fn web(uri: Option<&str>, title: Option<&str>) -> Self {
        Self {
            web: Some(WebReference {
                uri: uri.map(Into::into),
                title: title.map(Into::into),
            }),
        }
    }
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new generative backends.
/// The analyst works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs and health output
    fn name(&self) -> &str;

    /// Check if the provider is reachable and the credential is accepted
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion from messages. Exactly one outbound call.
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.model, "gemini-2.5-flash");
        assert_eq!(opts.response_format, ResponseFormat::Text);
        assert!(!opts.web_search);
        assert!(opts.temperature.is_none());
    }

    #[test]
    fn test_grounding_chunk_tolerates_missing_fields() {
        let chunk: GroundingChunk =
            serde_json::from_str(r#"{"web": {"uri": "https://x.io"}}"#).unwrap();
        let web = chunk.web.unwrap();
        assert_eq!(web.uri.as_deref(), Some("https://x.io"));
        assert!(web.title.is_none());

        let empty: GroundingChunk = serde_json::from_str("{}").unwrap();
        assert!(empty.web.is_none());
    }
}
