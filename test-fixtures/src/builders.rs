use chrono::{DateTime, Duration, Utc};
use garden_core::memory::{Memory, MemoryKind};
use garden_core::{Action, Analysis};
use serde_json::{json, Value};

/// Fluent builder for memory records.
#[derive(Debug, Clone)]
pub struct MemoryBuilder {
    memory: Memory,
}

impl MemoryBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            memory: Memory::new(id, MemoryKind::Text, format!("memory {id}"), 1_024, Utc::now()),
        }
    }

    pub fn kind(mut self, kind: MemoryKind) -> Self {
        self.memory.kind = kind;
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.memory.summary = summary.to_string();
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.memory.content = Some(content.to_string());
        self
    }

    pub fn filename(mut self, filename: &str) -> Self {
        self.memory.filename = Some(filename.to_string());
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.memory.size = size;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.memory.created_at = created_at;
        self
    }

    /// Created `months` 30-day months before now, plus a day of slack.
    pub fn aged_months(self, months: i64) -> Self {
        self.created_at(Utc::now() - Duration::days(months * 30 + 1))
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.memory.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn flag(mut self, flag: &str) -> Self {
        self.memory.metadata.flags.push(flag.to_string());
        self
    }

    pub fn stored_filename(mut self, name: &str) -> Self {
        self.memory.metadata.stored_filename = Some(name.to_string());
        self
    }

    pub fn override_action(mut self, action: Action) -> Self {
        self.memory.override_action = Some(action);
        self.memory.user_overridden = true;
        self
    }

    pub fn predicted(mut self, action: Action) -> Self {
        self.memory.predicted_action = Some(action);
        self
    }

    pub fn analysis(mut self, analysis: Analysis) -> Self {
        self.memory.attach_analysis(analysis);
        self
    }

    /// Attach a fresh model-derived analysis with the given action.
    pub fn analyzed(self, action: Action) -> Self {
        self.analysis(Analysis {
            action,
            model_derived: true,
            analyzed_at: Utc::now(),
            explanation: format!("model verdict {action} for fixture"),
            ..Default::default()
        })
    }

    pub fn build(self) -> Memory {
        self.memory
    }
}

/// A well-formed model reply for the given action and scores.
pub fn model_response(action: &str, r1m: f64, r1y: f64, attachment: f64) -> String {
    json!({
        "relevance1Month": r1m,
        "relevance1Year": r1y,
        "attachment": attachment,
        "action": action,
        "explanation": format!("The model recommends {action} based on age and relevance."),
        "summary": "fixture summary",
        "sentiment": "positive",
        "sentimentScore": 0.4,
        "confidence": 0.9
    })
    .to_string()
}

/// A legacy cluster record as it appeared on disk.
pub fn cluster_record_json(id: &str, name: &str, action: Option<&str>, ids: &[&str]) -> Value {
    let mut record = json!({ "id": id, "name": name, "memoryIds": ids });
    if let Some(action) = action {
        record["action"] = json!(action);
    }
    record
}
