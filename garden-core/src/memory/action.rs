//! The retention taxonomy and its normalizer.
//!
//! `normalize` is total: every input maps to one of the four actions. It is
//! applied wherever an action enters the system (cache reads, classifier
//! output, legacy cluster records, user overrides, encoded cluster ids),
//! which is why `Action` has no fallible `Deserialize`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Retention decision for a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Keep,
    Compress,
    LowRelevance,
    Delete,
}

impl Action {
    /// All actions in bucket order.
    pub const ALL: [Action; 4] = [
        Action::Keep,
        Action::Compress,
        Action::LowRelevance,
        Action::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Compress => "compress",
            Self::LowRelevance => "low_relevance",
            Self::Delete => "delete",
        }
    }

    /// Human-facing bucket name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Keep => "Keep",
            Self::Compress => "Compress",
            Self::LowRelevance => "Low Future Relevance",
            Self::Delete => "Delete",
        }
    }

    /// Position in [`Action::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Keep => 0,
            Self::Compress => 1,
            Self::LowRelevance => 2,
            Self::Delete => 3,
        }
    }

    /// Whether the action discards or demotes the memory.
    pub fn is_demoting(&self) -> bool {
        matches!(self, Self::LowRelevance | Self::Delete)
    }

    /// Recognize a canonical name or legacy alias, without the keep default.
    /// Matching is exact apart from case; surrounding whitespace is not
    /// stripped.
    pub fn recognize(raw: &str) -> Option<Action> {
        match raw.to_ascii_lowercase().as_str() {
            "keep" => Some(Self::Keep),
            "compress" => Some(Self::Compress),
            "low_relevance" | "forget" => Some(Self::LowRelevance),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Map any raw action value to the canonical taxonomy.
///
/// Null or empty maps to keep, "forget" (any case) to low_relevance, a
/// canonical name to itself, and everything else to keep.
pub fn normalize(raw: Option<&str>) -> Action {
    raw.and_then(Action::recognize).unwrap_or(Action::Keep)
}

/// Normalize an arbitrary JSON value. Non-strings count as malformed.
pub fn normalize_value(value: &serde_json::Value) -> Action {
    normalize(value.as_str())
}

impl FromStr for Action {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(normalize(Some(s)))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(normalize_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_values_map_to_themselves() {
        for action in Action::ALL {
            assert_eq!(normalize(Some(action.as_str())), action);
        }
    }

    #[test]
    fn forget_is_low_relevance_in_any_case() {
        assert_eq!(normalize(Some("forget")), Action::LowRelevance);
        assert_eq!(normalize(Some("FORGET")), Action::LowRelevance);
        assert_eq!(normalize(Some("Forget")), Action::LowRelevance);
    }

    #[test]
    fn unset_and_unknown_default_to_keep() {
        assert_eq!(normalize(None), Action::Keep);
        assert_eq!(normalize(Some("")), Action::Keep);
        assert_eq!(normalize(Some("archive")), Action::Keep);
        assert_eq!(normalize(Some("low relevance")), Action::Keep);
    }

    #[test]
    fn mixed_case_is_lowercased() {
        assert_eq!(normalize(Some("Compress")), Action::Compress);
        assert_eq!(normalize(Some("LOW_RELEVANCE")), Action::LowRelevance);
    }

    #[test]
    fn deserialize_never_fails() {
        let a: Action = serde_json::from_str("\"forget\"").unwrap();
        assert_eq!(a, Action::LowRelevance);
        let b: Action = serde_json::from_str("null").unwrap();
        assert_eq!(b, Action::Keep);
        let c: Action = serde_json::from_str("42").unwrap();
        assert_eq!(c, Action::Keep);
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Action::LowRelevance).unwrap(),
            "\"low_relevance\""
        );
    }
}
