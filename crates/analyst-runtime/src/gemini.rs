//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` over the Gemini `generateContent` REST API.

use analyst_core::{
    error::{AnalystError, Result},
    message::{system_instruction, Message, Role},
    provider::{
        Completion, FinishReason, GenerationOptions, GroundingChunk, LlmProvider,
        ResponseFormat, TokenUsage,
    },
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Default public endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent with every request
    pub api_key: String,

    /// Scheme + host, without the API version
    pub base_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read `GEMINI_API_KEY` (or `API_KEY`) and `GEMINI_BASE_URL`.
    ///
    /// A missing key is a startup error, not something to recover from.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = var("GEMINI_API_KEY")
            .or_else(|| var("API_KEY"))
            .ok_or_else(|| {
                AnalystError::Config("GEMINI_API_KEY environment variable not set".into())
            })?;

        let base_url = var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());

        Ok(Self { api_key, base_url })
    }
}

/// Gemini LLM provider
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create from configuration
    pub fn from_config(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(GeminiConfig::from_env()?))
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1beta/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Build the request body
    fn build_request<'a>(
        messages: &[Message],
        options: &'a GenerationOptions,
    ) -> GenerateContentRequest<'a> {
        let contents = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| Content {
                role: Some(m.role.to_string()),
                parts: vec![Part::text(&m.content)],
            })
            .collect();

        let (response_mime_type, response_schema) = match &options.response_format {
            ResponseFormat::Text => (None, None),
            ResponseFormat::JsonSchema(schema) => (Some("application/json"), Some(schema)),
        };

        let tools = if options.web_search {
            vec![Tool::google_search()]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            system_instruction: system_instruction(messages).map(|text| Content {
                role: None,
                parts: vec![Part::text(&text)],
            }),
            contents,
            tools,
            generation_config: GenerationConfig {
                temperature: options.temperature,
                response_mime_type,
                response_schema,
            },
        }
    }

    /// Convert the wire response into a completion
    fn convert_completion(response: GenerateContentResponse, model: &str) -> Completion {
        let candidate = response.candidates.into_iter().next().unwrap_or_default();

        let content = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        Completion {
            content,
            model: response.model_version.unwrap_or_else(|| model.to_string()),
            usage: response.usage_metadata.map(|u| {
                let prompt_tokens = u.prompt_token_count.unwrap_or(0);
                let completion_tokens = u.candidates_token_count.unwrap_or(0);
                TokenUsage {
                    prompt_tokens,
                    completion_tokens,
                    total_tokens: u.total_token_count.unwrap_or(prompt_tokens + completion_tokens),
                }
            }),
            finish_reason: candidate.finish_reason.as_deref().map(convert_finish_reason),
            grounding: candidate
                .grounding_metadata
                .map(|g| g.grounding_chunks)
                .unwrap_or_default(),
        }
    }

    /// Map a non-success HTTP status to an error
    fn status_error(status: StatusCode, body: &str) -> AnalystError {
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());
        let detail = format!("{status}: {detail}");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AnalystError::Auth(detail),
            StatusCode::TOO_MANY_REQUESTS => AnalystError::RateLimited(detail),
            s if s.is_server_error() => AnalystError::ProviderUnavailable(detail),
            _ => AnalystError::Provider(detail),
        }
    }
}

fn convert_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            FinishReason::ContentFilter
        }
        _ => FinishReason::Error,
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn health_check(&self) -> Result<bool> {
        let result = self
            .client
            .get(self.api_url("models?pageSize=1"))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => Ok(true),
            Ok(response) => {
                tracing::warn!("Gemini health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = Self::build_request(messages, options);
        let url = self.api_url(&format!("models/{}:generateContent", options.model));

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalystError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalystError::ProviderUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| AnalystError::Provider(format!("unexpected response body: {e}")))?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(AnalystError::Provider(format!("prompt blocked: {reason}")));
        }

        let completion = Self::convert_completion(parsed, &options.model);
        tracing::debug!(
            model = %completion.model,
            chars = completion.content.len(),
            grounding = completion.grounding.len(),
            "Gemini completion received"
        );

        Ok(completion)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: EmptyObject,
}

impl Tool {
    const fn google_search() -> Self {
        Self {
            google_search: EmptyObject {},
        }
    }
}

#[derive(Debug, Serialize)]
struct EmptyObject {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_core::provider::WebReference;
    use httpmock::prelude::*;
    use serde_json::json;

    const PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_config_missing_key_is_fatal() {
        let err = GeminiConfig::from_lookup(vars(&[])).unwrap_err();
        assert!(matches!(err, AnalystError::Config(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_config_blank_key_counts_as_missing() {
        let err = GeminiConfig::from_lookup(vars(&[("GEMINI_API_KEY", "   "), ("API_KEY", "")]))
            .unwrap_err();
        assert!(matches!(err, AnalystError::Config(_)));
    }

    #[test]
    fn test_config_api_key_fallback() {
        let config = GeminiConfig::from_lookup(vars(&[("API_KEY", "fallback-key")])).unwrap();
        assert_eq!(config.api_key, "fallback-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        let config = GeminiConfig::from_lookup(vars(&[
            ("GEMINI_API_KEY", " primary-key "),
            ("API_KEY", "fallback-key"),
            ("GEMINI_BASE_URL", "http://localhost:9000"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "primary-key");
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    fn provider(server: &MockServer) -> GeminiProvider {
        GeminiProvider::from_config(GeminiConfig::new("test-key").with_base_url(server.base_url()))
    }

    fn messages() -> Vec<Message> {
        vec![
            Message::system("Persona"),
            Message::user("Analisa o ativo BTC/USD agora."),
        ]
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = GeminiConfig::new("secret-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_schema_request_body() {
        let options = GenerationOptions {
            temperature: Some(0.2),
            response_format: ResponseFormat::JsonSchema(json!({"type": "OBJECT"})),
            ..Default::default()
        };
        let body =
            serde_json::to_value(GeminiProvider::build_request(&messages(), &options)).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Persona");
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_grounded_request_body() {
        let options = GenerationOptions {
            web_search: true,
            ..Default::default()
        };
        let body =
            serde_json::to_value(GeminiProvider::build_request(&messages(), &options)).unwrap();

        assert_eq!(body["tools"], json!([{"googleSearch": {}}]));
        assert!(body["generationConfig"].get("responseMimeType").is_none());
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_complete_maps_text_and_grounding() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(PATH)
                    .header("x-goog-api-key", "test-key")
                    .json_body_partial(r#"{"tools": [{"googleSearch": {}}]}"#);
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": {
                            "role": "model",
                            "parts": [{"text": "```json\n{\"asset\":"}, {"text": "\"BTC/USD\"}\n```"}]
                        },
                        "finishReason": "STOP",
                        "groundingMetadata": {
                            "groundingChunks": [
                                {"web": {"uri": "https://a.example", "title": "A"}},
                                {"web": {"uri": "https://b.example"}}
                            ]
                        }
                    }],
                    "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 80, "totalTokenCount": 200},
                    "modelVersion": "gemini-2.5-flash-001"
                }));
            })
            .await;

        let options = GenerationOptions {
            web_search: true,
            ..Default::default()
        };
        let completion = provider(&server).complete(&messages(), &options).await.unwrap();
        mock.assert_async().await;

        assert_eq!(completion.content, "```json\n{\"asset\":\"BTC/USD\"}\n```");
        assert_eq!(completion.model, "gemini-2.5-flash-001");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 200);
        assert_eq!(completion.grounding.len(), 2);
        assert_eq!(
            completion.grounding[1].web,
            Some(WebReference {
                uri: Some("https://b.example".into()),
                title: None
            })
        );
    }

    #[tokio::test]
    async fn test_complete_without_candidates_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200).json_body(json!({"candidates": []}));
            })
            .await;

        let completion = provider(&server)
            .complete(&messages(), &GenerationOptions::default())
            .await
            .unwrap();
        assert!(completion.content.is_empty());
        assert!(completion.grounding.is_empty());
    }

    #[tokio::test]
    async fn test_status_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(403).json_body(json!({
                    "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
                }));
            })
            .await;

        let err = provider(&server)
            .complete(&messages(), &GenerationOptions::default())
            .await
            .unwrap_err();
        match err {
            AnalystError::Auth(detail) => assert!(detail.contains("API key not valid")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            GeminiProvider::status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            AnalystError::RateLimited(_)
        ));
        assert!(matches!(
            GeminiProvider::status_error(StatusCode::SERVICE_UNAVAILABLE, "down"),
            AnalystError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            GeminiProvider::status_error(StatusCode::BAD_REQUEST, "{}"),
            AnalystError::Provider(_)
        ));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1beta/models").header("x-goog-api-key", "test-key");
                then.status(200).json_body(json!({"models": []}));
            })
            .await;

        assert!(provider(&server).health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_unavailable() {
        let provider =
            GeminiProvider::from_config(GeminiConfig::new("k").with_base_url("http://127.0.0.1:1"));
        let err = provider
            .complete(&messages(), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalystError::ProviderUnavailable(_)));
    }
}
