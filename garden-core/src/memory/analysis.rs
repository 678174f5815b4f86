use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::action::Action;
use super::lenient;
use crate::constants::{DEFAULT_CONFIDENCE, DEFAULT_SCORE};

/// Polarity of a memory's emotional tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
    Mixed,
}

impl SentimentLabel {
    /// Unknown labels read as neutral.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "mixed" => Self::Mixed,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Mixed => "mixed",
        }
    }
}

impl<'de> Deserialize<'de> for SentimentLabel {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value.as_str().map(Self::parse).unwrap_or_default())
    }
}

/// Sentiment label plus a score in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Sentiment {
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Build from loosely-typed parts, clamping the score.
    pub fn from_parts(label: Option<&Value>, score: Option<&Value>) -> Self {
        Self {
            label: label
                .and_then(Value::as_str)
                .map(SentimentLabel::parse)
                .unwrap_or_default(),
            score: lenient::signed_unit_or(score, 0.0),
        }
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    /// Accepts `{label, score}` or a bare label string.
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match &value {
            Value::Object(map) => Self::from_parts(map.get("label"), map.get("score")),
            Value::String(_) => Self::from_parts(Some(&value), None),
            _ => Self::neutral(),
        })
    }
}

/// The classifier's verdict on one memory.
///
/// Deserialization is forgiving so that legacy `nemotronAnalysis` blobs load:
/// every field has a default and out-of-range numbers are clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analysis {
    #[serde(rename = "relevance1Month", deserialize_with = "lenient::relevance")]
    pub relevance_1_month: f64,
    #[serde(rename = "relevance1Year", deserialize_with = "lenient::relevance")]
    pub relevance_1_year: f64,
    #[serde(deserialize_with = "lenient::relevance")]
    pub attachment: f64,
    #[serde(alias = "predictedAction")]
    pub action: Action,
    pub sentiment: Sentiment,
    #[serde(deserialize_with = "lenient::confidence")]
    pub confidence: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub explanation: String,
    #[serde(deserialize_with = "lenient::text")]
    pub summary: String,
    /// True when the verdict came from the model, false for the heuristic.
    #[serde(rename = "nemotronAnalyzed", deserialize_with = "lenient::flag")]
    pub model_derived: bool,
    #[serde(
        rename = "analyzedAt",
        alias = "nemotronUpdatedAt",
        deserialize_with = "lenient::timestamp"
    )]
    pub analyzed_at: DateTime<Utc>,
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            relevance_1_month: DEFAULT_SCORE,
            relevance_1_year: DEFAULT_SCORE,
            attachment: DEFAULT_SCORE,
            action: Action::Keep,
            sentiment: Sentiment::neutral(),
            confidence: DEFAULT_CONFIDENCE,
            explanation: String::new(),
            summary: String::new(),
            model_derived: false,
            analyzed_at: DateTime::<Utc>::default(),
        }
    }
}

impl Analysis {
    /// Whether the verdict is younger than `max_age` at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: chrono::Duration) -> bool {
        now.signed_duration_since(self.analyzed_at) < max_age
    }
}
