//! Interpreting raw completion text.
//!
//! First choice is the first well-formed JSON object in the reply, after
//! removing code fences. Failing that, a keyword and number scan over the
//! free text. Field values are not checked here; see `validate`.

use std::sync::LazyLock;

use garden_core::errors::ClassifierError;
use regex::Regex;
use serde_json::{Map, Value};

static FENCE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_-]*").ok());
static ACTION_WORD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(keep|compress|low_relevance|forget|delete)\b").ok());
static NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").ok());

/// Score fields filled, in order, by the free-text extractor.
const SCORE_FIELDS: [&str; 3] = ["relevance1Month", "relevance1Year", "attachment"];

/// Explanation length kept from a free-text reply.
const TEXT_EXPLANATION_CHARS: usize = 200;

/// How a verdict was recovered from the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Structured,
    TextExtracted,
}

/// Raw, unvalidated verdict fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVerdict {
    pub fields: Map<String, Value>,
    pub mode: ParseMode,
}

pub fn strip_code_fences(text: &str) -> String {
    match FENCE.as_ref() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Find the first balanced `{...}` that parses as a JSON object.
///
/// Braces inside string literals are ignored while scanning.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        if let Some(close) = matching_brace(bytes, open) {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&text[open..=close]) {
                return Some(map);
            }
        }
        start = open + 1;
    }
    None
}

fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Pull an action keyword and up to three scores out of prose.
///
/// Returns `None` when the text carries neither.
pub fn extract_from_text(text: &str) -> Option<Map<String, Value>> {
    let action = ACTION_WORD
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase());
    let scores: Vec<f64> = NUMBER
        .as_ref()
        .map(|re| {
            re.find_iter(text)
                .filter_map(|m| m.as_str().parse::<f64>().ok())
                .take(SCORE_FIELDS.len())
                .collect()
        })
        .unwrap_or_default();

    if action.is_none() && scores.is_empty() {
        return None;
    }

    let mut fields = Map::new();
    if let Some(action) = action {
        fields.insert("action".into(), Value::String(action));
    }
    for (field, score) in SCORE_FIELDS.iter().zip(scores) {
        fields.insert((*field).into(), Value::from(score));
    }
    let explanation: String = text.trim().chars().take(TEXT_EXPLANATION_CHARS).collect();
    fields.insert("explanation".into(), Value::String(explanation));
    Some(fields)
}

/// Parse a completion reply into raw verdict fields.
pub fn parse_completion(text: &str) -> Result<RawVerdict, ClassifierError> {
    let cleaned = strip_code_fences(text);
    if let Some(fields) = extract_json_object(&cleaned) {
        return Ok(RawVerdict {
            fields,
            mode: ParseMode::Structured,
        });
    }
    extract_from_text(&cleaned)
        .map(|fields| RawVerdict {
            fields,
            mode: ParseMode::TextExtracted,
        })
        .ok_or_else(|| ClassifierError::MalformedResponse {
            reason: "no JSON object, action keyword, or score in reply".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fenced_json_is_extracted() {
        let reply = "Here you go:\n```json\n{\"action\": \"compress\", \"attachment\": 0.3}\n```";
        let parsed = parse_completion(reply).unwrap();
        assert_eq!(parsed.mode, ParseMode::Structured);
        assert_eq!(parsed.fields["action"], json!("compress"));
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scan() {
        let reply = r#"{"explanation": "uses {curly} braces", "action": "keep"} trailing {junk"#;
        let fields = extract_json_object(reply).unwrap();
        assert_eq!(fields["explanation"], json!("uses {curly} braces"));
    }

    #[test]
    fn first_well_formed_object_wins() {
        let reply = r#"{not json} then {"action": "delete"} and {"action": "keep"}"#;
        assert_eq!(extract_json_object(reply).unwrap()["action"], json!("delete"));
    }

    #[test]
    fn prose_falls_back_to_keyword_and_scores() {
        let reply = "I would FORGET this. Relevance 0.2 now, 0.1 later, attachment 0.05, overall 9.";
        let parsed = parse_completion(reply).unwrap();
        assert_eq!(parsed.mode, ParseMode::TextExtracted);
        assert_eq!(parsed.fields["action"], json!("forget"));
        assert_eq!(parsed.fields["relevance1Month"], json!(0.2));
        assert_eq!(parsed.fields["relevance1Year"], json!(0.1));
        assert_eq!(parsed.fields["attachment"], json!(0.05));
    }

    #[test]
    fn nothing_recoverable_is_malformed() {
        let err = parse_completion("I cannot help with that.").unwrap_err();
        assert!(matches!(err, ClassifierError::MalformedResponse { .. }));
    }

    #[test]
    fn keyword_must_be_a_whole_word() {
        assert!(extract_from_text("the keeper of records").is_none());
    }
}
