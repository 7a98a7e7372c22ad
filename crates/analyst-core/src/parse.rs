//! Response Parsing
//!
//! The model answers in one of two shapes depending on `OutputMode`:
//! schema-constrained JSON (the whole text is the object) or prose with the
//! object inside a markdown ```json fence. Both paths live here.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::analyst::OutputMode;
use crate::error::{AnalystError, Result};
use crate::model::{AnalysisResult, Source};
use crate::provider::GroundingChunk;

/// First multi-line fenced block, with or without a `json` tag. The closing
/// fence must start its own line; a JSON string cannot hold a raw newline, so
/// backticks inside string values never end the block.
static FENCED_BLOCK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?[ \t]*\r?\n(?:(.*?)\r?\n)?[ \t]*```").ok()
});

/// Single-line fence such as ```` ```json {"asset": "BTC"}``` ````
static INLINE_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?[ \t]*(\{.*\})[ \t]*```").ok());

/// Return the contents of the first fenced code block
pub fn fenced_block(text: &str) -> Option<&str> {
    if let Some(cap) = FENCED_BLOCK.as_ref().and_then(|re| re.captures(text)) {
        return Some(cap.get(1).map_or("", |m| m.as_str()).trim());
    }

    INLINE_BLOCK
        .as_ref()?
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
}

/// Extract the JSON object from raw model text
pub fn extract_json(text: &str, mode: OutputMode) -> Result<Value> {
    let body = match mode {
        OutputMode::Schema => text.trim(),
        OutputMode::Grounded => fenced_block(text)
            .ok_or_else(|| AnalystError::Parse("no fenced JSON block in response".into()))?,
    };

    if body.is_empty() {
        return Err(AnalystError::Parse("empty JSON body".into()));
    }

    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(AnalystError::Parse(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    Ok(value)
}

/// Parse the analysis object out of raw model text
pub fn parse_analysis(text: &str, mode: OutputMode) -> Result<AnalysisResult> {
    let value = extract_json(text, mode)?;
    Ok(serde_json::from_value(value)?)
}

/// Keep the citations that carry both a URI and a title, in order
pub fn extract_sources(chunks: &[GroundingChunk]) -> Vec<Source> {
    chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
            let title = web.title.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
            Some(Source {
                uri: uri.to_string(),
                title: title.to_string(),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Recommendation;

    const FENCED: &str = "prefix text\n```json\n{\"asset\":\"BTC/USD\",\"price\":\"$97,500\",\"recommendation\":\"COMPRAR\"}\n```\nsuffix";

    #[test]
    fn test_fenced_extraction_ignores_prose() {
        let value = extract_json(FENCED, OutputMode::Grounded).unwrap();
        assert_eq!(value["asset"], "BTC/USD");
        assert_eq!(value["price"], "$97,500");
    }

    #[test]
    fn test_fenced_block_without_language_tag() {
        let text = "Aqui está:\n```\n{\"asset\": \"ETH\"}\n```";
        assert_eq!(fenced_block(text), Some("{\"asset\": \"ETH\"}"));
    }

    #[test]
    fn test_first_fenced_block_wins() {
        let text = "```json\n{\"asset\": \"SOL\"}\n```\nand\n```json\n{\"asset\": \"ADA\"}\n```";
        let value = extract_json(text, OutputMode::Grounded).unwrap();
        assert_eq!(value["asset"], "SOL");
    }

    #[test]
    fn test_backticks_inside_a_string_value_do_not_close_the_fence() {
        let text = "```json\n{\"asset\":\"BTC\",\"summary\":\"use ``` here\"}\n```\nfim";
        let value = extract_json(text, OutputMode::Grounded).unwrap();
        assert_eq!(value["asset"], "BTC");
        assert_eq!(value["summary"], "use ``` here");
    }

    #[test]
    fn test_indented_closing_fence() {
        let text = "  ```json\r\n  {\"asset\": \"XRP\"}\r\n  ```";
        assert_eq!(fenced_block(text), Some("{\"asset\": \"XRP\"}"));
    }

    #[test]
    fn test_inline_fence_on_one_line() {
        let text = "Resultado: ```json {\"asset\": \"DOGE\", \"rsi\": \"71\"}``` pronto.";
        let value = extract_json(text, OutputMode::Grounded).unwrap();
        assert_eq!(value["asset"], "DOGE");
        assert_eq!(value["rsi"], "71");
    }

    #[test]
    fn test_empty_fence_is_an_empty_body() {
        assert_eq!(fenced_block("```json\n```"), Some(""));
        let err = extract_json("```json\n```", OutputMode::Grounded).unwrap_err();
        assert!(err.to_string().contains("empty JSON body"));
    }

    #[test]
    fn test_grounded_mode_requires_a_fence() {
        let err = extract_json("{\"asset\": \"BTC\"}", OutputMode::Grounded).unwrap_err();
        assert!(matches!(err, AnalystError::Parse(_)));
    }

    #[test]
    fn test_schema_mode_parses_whole_text() {
        let analysis = parse_analysis(
            "  {\"asset\": \"EUR/USD\", \"recommendation\": \"VENDER\"}\n",
            OutputMode::Schema,
        )
        .unwrap();
        assert_eq!(analysis.asset, "EUR/USD");
        assert_eq!(analysis.recommendation, Recommendation::Sell);
    }

    #[test]
    fn test_schema_mode_rejects_fenced_text() {
        assert!(extract_json(FENCED, OutputMode::Schema).is_err());
    }

    #[test]
    fn test_invalid_json_fails() {
        let err = extract_json("```json\n{not json}\n```", OutputMode::Grounded).unwrap_err();
        assert!(matches!(err, AnalystError::Json(_)));
        assert!(extract_json("   ", OutputMode::Schema).is_err());
    }

    #[test]
    fn test_non_object_json_fails() {
        let err = extract_json("[1, 2]", OutputMode::Schema).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_extract_sources_keeps_complete_entries_in_order() {
        let chunks = vec![
            GroundingChunk::web(Some("https://a.example"), Some("A")),
            GroundingChunk::web(Some("https://b.example"), None),
            GroundingChunk::default(),
            GroundingChunk::web(None, Some("C")),
            GroundingChunk::web(Some("https://d.example"), Some("D")),
            GroundingChunk::web(Some("https://e.example"), Some("  ")),
        ];

        let sources = extract_sources(&chunks);
        assert_eq!(
            sources,
            vec![
                Source {
                    uri: "https://a.example".into(),
                    title: "A".into(),
                },
                Source {
                    uri: "https://d.example".into(),
                    title: "D".into(),
                },
            ]
        );
    }

    #[test]
    fn test_extract_sources_empty() {
        assert!(extract_sources(&[]).is_empty());
    }
}
