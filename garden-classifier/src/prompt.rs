//! Prompt construction.

use chrono::{DateTime, Utc};
use garden_core::constants::{BLURRY_FLAG, CONTEXT_EXCERPT_CHARS};
use garden_core::memory::Memory;
use garden_core::models::UserProfile;

/// One-line digest of what is known about a memory, fields joined by ` | `.
pub fn context_summary(memory: &Memory, now: DateTime<Utc>) -> String {
    let meta = &memory.metadata;
    let mut parts = vec![
        format!("Age: {} months", memory.age_months(now)),
        format!("Type: {}", memory.kind.as_str()),
    ];
    if let Some(title) = memory.title.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!("Title: {title}"));
    }
    if !memory.summary.is_empty() {
        parts.push(format!("Summary: {}", memory.summary));
    }
    if let Some(content) = memory.content.as_deref() {
        let head: String = content.chars().take(CONTEXT_EXCERPT_CHARS).collect();
        let excerpt = collapse_whitespace(&head);
        if !excerpt.is_empty() {
            let ellipsis = if content.chars().count() > CONTEXT_EXCERPT_CHARS { "..." } else { "" };
            parts.push(format!("Excerpt: {excerpt}{ellipsis}"));
        }
    }
    if let Some(quality) = &meta.image_quality {
        parts.push(format!("Image quality: {quality}"));
    }
    if let Some(hint) = &meta.quality_hint {
        parts.push(format!("Quality hint: {hint}"));
    }
    if let (Some(w), Some(h)) = (meta.width, meta.height) {
        parts.push(format!("Dimensions: {w}x{h}"));
    }
    if let Some(pages) = meta.page_count {
        parts.push(format!("Pages: {pages}"));
    }
    if let Some(columns) = meta.columns {
        parts.push(format!("Columns: {columns}"));
    }
    if let Some(rows) = meta.rows {
        parts.push(format!("Rows: {rows}"));
    }
    if let Some(topic) = &meta.topic {
        parts.push(format!("Topic: {topic}"));
    }
    if !memory.tags.is_empty() {
        parts.push(format!("Tags: {}", memory.tags.join(", ")));
    }
    if let Some(hint) = &meta.sentiment_hint {
        parts.push(format!("Sentiment hint: {hint}"));
    }
    if let Some(importance) = &meta.importance {
        parts.push(format!("Importance level: {importance}"));
    }
    if meta.has_flag(BLURRY_FLAG) {
        parts.push("Flag: blurry".to_string());
    }
    if let Some(category) = &meta.category {
        parts.push(format!("Category: {category}"));
    }
    if memory.size > 0 {
        parts.push(format!("Size: {} bytes", memory.size));
    }
    parts.join(" | ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds the classification prompt.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    preview_chars: usize,
}

impl PromptBuilder {
    pub fn new(preview_chars: usize) -> Self {
        Self { preview_chars }
    }

    pub fn build(&self, memory: &Memory, profile: Option<&UserProfile>, now: DateTime<Utc>) -> String {
        let preview: String = memory.body().chars().take(self.preview_chars).collect();
        let tags = if memory.tags.is_empty() {
            "none".to_string()
        } else {
            memory.tags.join(", ")
        };
        let user_line = profile
            .and_then(UserProfile::prompt_line)
            .map(|line| format!("{line}\n"))
            .unwrap_or_default();

        format!(
            r#"You are a memory management assistant. Analyze the following memory and decide the best retention action: keep, compress, low_relevance, or delete.

Memory details:
- Type: {kind}
- Age: {age} months old
- Created: {created}
- Size: {size} bytes
- Tags: {tags}
- Context: {context}
- Content: {preview}
{user_line}
Guidelines:
- KEEP: important, meaningful memories with high emotional value, recent documents needed for reference, or significant life events
- COMPRESS: moderately important memories that could be stored more efficiently, older but still relevant content
- LOW_RELEVANCE: outdated or low quality content with little future value
- DELETE: duplicates, junk, or content with no value at all

Respond with JSON only:
{{
  "relevance1Month": 0.0-1.0,
  "relevance1Year": 0.0-1.0,
  "attachment": 0.0-1.0,
  "action": "keep|compress|low_relevance|delete",
  "explanation": "one or two sentences",
  "summary": "short summary of the memory",
  "sentiment": "positive|negative|neutral|mixed",
  "sentimentScore": -1.0 to 1.0,
  "confidence": 0.0-1.0
}}"#,
            kind = memory.kind.as_str(),
            age = memory.age_months(now),
            created = memory.created_at.format("%Y-%m-%d"),
            size = memory.size,
            context = context_summary(memory, now),
        )
    }
}
