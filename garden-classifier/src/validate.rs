//! Turning raw verdict fields into a valid [`Analysis`].
//!
//! Nothing here fails. Missing or out-of-range values are replaced in place
//! and logged at debug.

use chrono::{DateTime, Utc};
use garden_core::constants::{BLURRY_FLAG, DEFAULT_CONFIDENCE, DEFAULT_SCORE};
use garden_core::memory::lenient::{as_f64, unit_or};
use garden_core::memory::{normalize_value, Analysis, Memory, Sentiment};
use serde_json::{Map, Value};
use tracing::debug;

fn score(fields: &Map<String, Value>, key: &str, default: f64) -> f64 {
    let raw = fields.get(key);
    let value = unit_or(raw, default);
    if raw.and_then(as_f64) != Some(value) {
        debug!(field = key, ?raw, corrected = value, "verdict field corrected");
    }
    value
}

fn sentiment(fields: &Map<String, Value>) -> Sentiment {
    match fields.get("sentiment") {
        Some(Value::Object(inner)) => Sentiment::from_parts(inner.get("label"), inner.get("score")),
        label => Sentiment::from_parts(label, fields.get("sentimentScore")),
    }
}

/// Explanation built from the evidence when the model gives too little.
pub fn synthesize_explanation(memory: &Memory, analysis: &Analysis, now: DateTime<Utc>) -> String {
    let blurry = if memory.metadata.has_flag(BLURRY_FLAG) {
        "; flagged as blurry"
    } else {
        ""
    };
    format!(
        "Age {} months; relevance {:.2} in one month and {:.2} in one year; attachment {:.2}{}. Suggested action: {}.",
        memory.age_months(now),
        analysis.relevance_1_month,
        analysis.relevance_1_year,
        analysis.attachment,
        blurry,
        analysis.action,
    )
}

/// Build a model-derived analysis from raw fields.
pub fn validate(
    fields: &Map<String, Value>,
    memory: &Memory,
    now: DateTime<Utc>,
    min_explanation_chars: usize,
) -> Analysis {
    let raw_action = fields
        .get("action")
        .or_else(|| fields.get("predictedAction"))
        .unwrap_or(&Value::Null);
    let action = normalize_value(raw_action);
    if raw_action.as_str() != Some(action.as_str()) {
        debug!(raw = %raw_action, normalized = %action, "verdict action normalized");
    }

    let mut analysis = Analysis {
        relevance_1_month: score(fields, "relevance1Month", DEFAULT_SCORE),
        relevance_1_year: score(fields, "relevance1Year", DEFAULT_SCORE),
        attachment: score(fields, "attachment", DEFAULT_SCORE),
        action,
        sentiment: sentiment(fields),
        confidence: score(fields, "confidence", DEFAULT_CONFIDENCE),
        explanation: String::new(),
        summary: fields
            .get("summary")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        model_derived: true,
        analyzed_at: now,
    };

    let explanation = fields
        .get("explanation")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    analysis.explanation = if explanation.chars().count() < min_explanation_chars {
        debug!(memory_id = %memory.id, "explanation too short, synthesizing");
        synthesize_explanation(memory, &analysis, now)
    } else {
        explanation.to_string()
    };
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_core::memory::{Action, MemoryKind, SentimentLabel};
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn memory() -> Memory {
        Memory::new("m1", MemoryKind::Image, "photo", 10, Utc::now() - chrono::Duration::days(400))
    }

    #[test]
    fn out_of_range_values_are_clamped_and_defaulted() {
        let raw = fields(json!({
            "relevance1Month": 1.8,
            "relevance1Year": "-0.4",
            "attachment": "lots",
            "action": "Forget",
            "sentiment": "JOYFUL",
            "sentimentScore": 3,
            "explanation": "This screenshot is outdated and low value."
        }));
        let a = validate(&raw, &memory(), Utc::now(), 20);
        assert_eq!(a.relevance_1_month, 1.0);
        assert_eq!(a.relevance_1_year, 0.0);
        assert_eq!(a.attachment, 0.5);
        assert_eq!(a.confidence, 0.6);
        assert_eq!(a.action, Action::LowRelevance);
        assert_eq!(a.sentiment.label, SentimentLabel::Neutral);
        assert_eq!(a.sentiment.score, 1.0);
        assert!(a.model_derived);
    }

    #[test]
    fn nested_sentiment_object_is_accepted() {
        let raw = fields(json!({"sentiment": {"label": "mixed", "score": -0.25}}));
        let a = validate(&raw, &memory(), Utc::now(), 20);
        assert_eq!(a.sentiment.label, SentimentLabel::Mixed);
        assert_eq!(a.sentiment.score, -0.25);
        assert_eq!(a.action, Action::Keep);
    }

    #[test]
    fn short_explanation_is_synthesized() {
        let mut m = memory();
        m.metadata.flags.push("blurry".into());
        let raw = fields(json!({"action": "delete", "relevance1Month": 0.1, "explanation": "junk"}));
        let a = validate(&raw, &m, Utc::now(), 20);
        assert!(a.explanation.starts_with("Age 13 months; relevance 0.10"));
        assert!(a.explanation.contains("blurry"));
        assert!(a.explanation.ends_with("Suggested action: delete."));
    }
}
