use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::action::Action;
use super::analysis::Analysis;
use super::kind::MemoryKind;
use super::lenient;
use crate::constants::{DAYS_PER_MONTH, UNREADABLE_FLAG};

/// Free-form metadata produced by the scanner.
///
/// Known keys get typed fields; everything else is preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryMetadata {
    #[serde(deserialize_with = "lenient::string_list", skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub quality_hint: Option<String>,
    #[serde(deserialize_with = "lenient::optional_u64", skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(deserialize_with = "lenient::optional_u64", skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(deserialize_with = "lenient::optional_u64", skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
    #[serde(deserialize_with = "lenient::optional_u64", skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,
    #[serde(deserialize_with = "lenient::optional_u64", skip_serializing_if = "Option::is_none")]
    pub columns: Option<u64>,
    #[serde(deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub importance: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub sentiment_hint: Option<String>,
    /// File name of the stored binary upload, if any.
    #[serde(deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub stored_filename: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MemoryMetadata {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f.eq_ignore_ascii_case(flag))
    }
}

/// One ingested content item. `id` is the join key for analyses and
/// cluster membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: MemoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::size")]
    pub size: u64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: MemoryMetadata,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,
    /// User-set action; wins over every other source.
    #[serde(
        default,
        deserialize_with = "lenient::optional_action",
        skip_serializing_if = "Option::is_none"
    )]
    pub override_action: Option<Action>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub user_overridden: bool,
    /// Last classifier verdict.
    #[serde(
        default,
        deserialize_with = "lenient::optional_action",
        skip_serializing_if = "Option::is_none"
    )]
    pub predicted_action: Option<Action>,
    #[serde(default, alias = "nemotronAnalysis", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    /// Manual cluster reference; cleared by declustering.
    #[serde(default, deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
}

impl Memory {
    /// Minimal draft, as produced by the scanner.
    pub fn new(
        id: impl Into<String>,
        kind: MemoryKind,
        summary: impl Into<String>,
        size: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            filename: None,
            summary: summary.into(),
            content: None,
            size,
            created_at,
            metadata: MemoryMetadata::default(),
            tags: Vec::new(),
            override_action: None,
            user_overridden: false,
            predicted_action: None,
            analysis: None,
            cluster: None,
            cluster_name: None,
        }
    }

    /// Stand-in for a stored row whose payload cannot be decoded. It keeps the
    /// row's id and size so the row still lands in a bucket and can be
    /// deleted.
    pub fn unreadable(id: impl Into<String>, size: u64, created_at: DateTime<Utc>) -> Self {
        let mut memory = Self::new(id, MemoryKind::Other, String::new(), size, created_at);
        memory.metadata.flags.push(UNREADABLE_FLAG.to_string());
        memory
    }

    pub fn is_unreadable(&self) -> bool {
        self.metadata.has_flag(UNREADABLE_FLAG)
    }

    /// Whole 30-day months between creation and `now`.
    pub fn age_months(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.created_at).num_days().abs() / DAYS_PER_MONTH
    }

    /// Content if present, otherwise the summary.
    pub fn body(&self) -> &str {
        match self.content.as_deref() {
            Some(content) if !content.is_empty() => content,
            _ => &self.summary,
        }
    }

    /// Lowercased tags from both the tag list and `metadata.tags`.
    pub fn tag_set(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.tags.iter().map(|t| t.to_ascii_lowercase()).collect();
        if let Some(Value::Array(extra)) = self.metadata.extra.get("tags") {
            tags.extend(
                extra
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_ascii_lowercase),
            );
        }
        tags.sort();
        tags.dedup();
        tags
    }

    /// The memory's own verdict: predicted action, else the analysis action.
    pub fn own_action(&self) -> Option<Action> {
        self.predicted_action
            .or_else(|| self.analysis.as_ref().map(|a| a.action))
    }

    /// Record a fresh verdict on the memory.
    pub fn attach_analysis(&mut self, analysis: Analysis) {
        self.predicted_action = Some(analysis.action);
        self.analysis = Some(analysis);
    }
}
