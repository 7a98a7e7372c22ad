//! Domain Models
//!
//! The analysis returned by the model and the citations attached to it.
//! Market figures stay display strings: nothing here does arithmetic on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::display::display_text;

/// Recommended action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recommendation {
    Buy,
    Sell,
    Wait,
    /// Any value outside the known set, kept verbatim
    Unrecognized(String),
}

impl Recommendation {
    /// Wire values the response schema allows
    pub const ALLOWED: [&'static str; 3] = ["COMPRAR", "VENDER", "AGUARDAR"];

    /// Parse a label case-insensitively; English labels are accepted too
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "COMPRAR" | "BUY" => Self::Buy,
            "VENDER" | "SELL" => Self::Sell,
            "AGUARDAR" | "WAIT" => Self::Wait,
            _ => Self::Unrecognized(label.to_string()),
        }
    }

    /// Label shown to the user
    pub fn label(&self) -> &str {
        match self {
            Self::Buy => "COMPRAR",
            Self::Sell => "VENDER",
            Self::Wait => "AGUARDAR",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl Default for Recommendation {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Recommendation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_label(&display_text(&value)))
    }
}

/// Accept strings, numbers, booleans and null for a display field
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(display_text(&value))
}

/// Structured trading analysis for one asset
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    /// Uppercased symbol echoing the query (e.g., "BTC/USD")
    #[serde(deserialize_with = "lenient_string")]
    pub asset: String,

    #[serde(deserialize_with = "lenient_string")]
    pub price: String,

    /// Sign-prefixed 24h change
    #[serde(rename = "change24h", deserialize_with = "lenient_string")]
    pub change_24h: String,

    /// Sign-prefixed 7d change
    #[serde(rename = "change7d", deserialize_with = "lenient_string")]
    pub change_7d: String,

    #[serde(deserialize_with = "lenient_string")]
    pub volume: String,

    #[serde(deserialize_with = "lenient_string")]
    pub trend_short_term: String,

    #[serde(deserialize_with = "lenient_string")]
    pub trend_medium_term: String,

    #[serde(deserialize_with = "lenient_string")]
    pub support: String,

    #[serde(deserialize_with = "lenient_string")]
    pub resistance: String,

    #[serde(deserialize_with = "lenient_string")]
    pub rsi: String,

    #[serde(deserialize_with = "lenient_string")]
    pub macd: String,

    #[serde(deserialize_with = "lenient_string")]
    pub moving_averages: String,

    pub recommendation: Recommendation,

    #[serde(deserialize_with = "lenient_string")]
    pub stop_loss: String,

    #[serde(deserialize_with = "lenient_string")]
    pub take_profit: String,

    /// Single glyph summarizing the trend
    #[serde(deserialize_with = "lenient_string")]
    pub chart_emoji: String,

    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,
}

/// A citation surfaced by the model's retrieval step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Everything one query produces; replaced wholesale by the next query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: AnalysisResult,

    #[serde(default)]
    pub sources: Vec<Source>,

    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn new(analysis: AnalysisResult, sources: Vec<Source>) -> Self {
        Self {
            analysis,
            sources,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recommendation_labels() {
        assert_eq!(Recommendation::from_label("COMPRAR"), Recommendation::Buy);
        assert_eq!(Recommendation::from_label("vender"), Recommendation::Sell);
        assert_eq!(Recommendation::from_label(" AGUARDAR "), Recommendation::Wait);
        assert_eq!(Recommendation::from_label("wait"), Recommendation::Wait);
        assert_eq!(
            Recommendation::from_label("MANTER"),
            Recommendation::Unrecognized("MANTER".into())
        );
    }

    #[test]
    fn test_recommendation_serializes_as_label() {
        assert_eq!(serde_json::to_value(Recommendation::Sell).unwrap(), json!("VENDER"));
        let raw: Recommendation = serde_json::from_value(json!("HOLD")).unwrap();
        assert_eq!(serde_json::to_value(&raw).unwrap(), json!("HOLD"));
    }

    #[test]
    fn test_analysis_result_accepts_numeric_fields() {
        let analysis: AnalysisResult = serde_json::from_value(json!({
            "asset": "ETH",
            "price": 3450.5,
            "change24h": -1.8,
            "change7d": "+4.1%",
            "recommendation": "COMPRAR"
        }))
        .unwrap();

        assert_eq!(analysis.price, "3450.5");
        assert_eq!(analysis.change_24h, "-1.8");
        assert_eq!(analysis.change_7d, "+4.1%");
        assert_eq!(analysis.recommendation, Recommendation::Buy);
        assert_eq!(analysis.summary, "");
    }

    #[test]
    fn test_analysis_result_uses_camel_case_names() {
        let analysis = AnalysisResult {
            trend_short_term: "Alta".into(),
            stop_loss: "95000".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&analysis).unwrap();

        assert_eq!(value["trendShortTerm"], "Alta");
        assert_eq!(value["stopLoss"], "95000");
        assert!(value.get("change24h").is_some());
        assert!(value.get("movingAverages").is_some());
    }
}
