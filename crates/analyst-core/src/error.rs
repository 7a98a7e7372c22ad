//! Error Types

use thiserror::Error;

/// Result type alias for analyst operations
pub type Result<T> = std::result::Result<T, AnalystError>;

/// Shown inline when the user submits an empty symbol
pub const EMPTY_SYMBOL_MESSAGE: &str = "Por favor, insira um símbolo de ativo.";

/// Generic message for every failure of the analysis pipeline
pub const ANALYSIS_UNAVAILABLE_MESSAGE: &str =
    "Não foi possível obter a análise. Verifique o símbolo do ativo e tente novamente.";

/// Analyst error types
#[derive(Error, Debug)]
pub enum AnalystError {
    /// User input rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// The analysis could not be produced (transport, empty body or parse failure)
    #[error("Analysis unavailable: {0}")]
    AnalysisUnavailable(String),

    /// Missing or invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Rate limited by the provider
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Credential rejected by the provider
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Model output could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AnalystError {
    /// Whether the error was caused by the user's input rather than the pipeline
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Convert to the localized message shown to the user.
    ///
    /// Transport, provider and parse failures all collapse into the same text;
    /// the detail only goes to the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Config(_) => "O serviço de análise não está configurado.".into(),
            _ => ANALYSIS_UNAVAILABLE_MESSAGE.into(),
        }
    }
}

impl From<anyhow::Error> for AnalystError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
