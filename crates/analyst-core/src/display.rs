//! Display Helpers
//!
//! Rendering rules that do not depend on the UI framework: value coercion,
//! sign-based coloring and the recommendation panel style.

use serde_json::Value;

use crate::model::Recommendation;

/// Coerce any JSON value into display text.
///
/// The model sometimes answers a nominally string field with a number, so
/// every field passes through here before any prefix check is applied.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Color treatment for a delta value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Positive => "tone-positive",
            Self::Negative => "tone-negative",
            Self::Neutral => "tone-neutral",
        }
    }
}

/// Classify a display value by its leading sign
pub fn delta_tone(text: &str) -> Tone {
    match text.trim_start().chars().next() {
        Some('+') => Tone::Positive,
        Some('-' | '\u{2212}') => Tone::Negative,
        _ => Tone::Neutral,
    }
}

/// Icon shown next to the recommendation label
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecommendationIcon {
    ArrowUp,
    ArrowDown,
    Pause,
}

impl RecommendationIcon {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::ArrowUp => "▲",
            Self::ArrowDown => "▼",
            Self::Pause => "⏸",
        }
    }
}

/// Visual treatment of the recommendation panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecommendationStyle {
    pub panel_class: &'static str,
    pub text_class: &'static str,
    pub icon: RecommendationIcon,
    pub label: String,
}

impl RecommendationStyle {
    const BUY: (&'static str, &'static str, RecommendationIcon) =
        ("recommendation-buy", "text-buy", RecommendationIcon::ArrowUp);
    const SELL: (&'static str, &'static str, RecommendationIcon) =
        ("recommendation-sell", "text-sell", RecommendationIcon::ArrowDown);
    const WAIT: (&'static str, &'static str, RecommendationIcon) =
        ("recommendation-wait", "text-wait", RecommendationIcon::Pause);

    /// Style for a recommendation. Unrecognized values take the WAIT
    /// treatment but keep their raw label.
    pub fn for_recommendation(recommendation: &Recommendation) -> Self {
        let (panel_class, text_class, icon) = match recommendation {
            Recommendation::Buy => Self::BUY,
            Recommendation::Sell => Self::SELL,
            Recommendation::Wait | Recommendation::Unrecognized(_) => Self::WAIT,
        };

        Self {
            panel_class,
            text_class,
            icon,
            label: recommendation.label().to_string(),
        }
    }
}
