//! Rule-based verdict used whenever the completion service cannot answer.

use chrono::{DateTime, Utc};
use garden_core::constants::{
    BLURRY_FLAG, DEFAULT_SCORE, HEURISTIC_CONFIDENCE, SENTIMENTAL_ATTACHMENT, SENTIMENTAL_TAGS,
};
use garden_core::memory::{Action, Analysis, Memory, Sentiment};

/// (1-month, 1-year) relevance by age in months.
fn relevance_curve(age_months: i64) -> (f64, f64) {
    match age_months {
        a if a > 36 => (0.2, 0.1),
        a if a > 24 => (0.3, 0.2),
        a if a > 12 => (0.6, 0.4),
        _ => (0.8, 0.7),
    }
}

fn action_for(r1m: f64, r1y: f64, age_months: i64) -> Action {
    if r1y < 0.2 && age_months > 24 {
        Action::LowRelevance
    } else if r1m < 0.4 || r1y < 0.3 {
        Action::Compress
    } else {
        Action::Keep
    }
}

fn is_sentimental(memory: &Memory) -> bool {
    memory
        .tag_set()
        .iter()
        .any(|tag| SENTIMENTAL_TAGS.contains(&tag.as_str()))
}

/// Always succeeds. The result has `model_derived == false`.
pub fn heuristic_analysis(memory: &Memory, now: DateTime<Utc>) -> Analysis {
    let age = memory.age_months(now);
    let (r1m, r1y) = relevance_curve(age);
    let mut action = action_for(r1m, r1y, age);
    let mut attachment = DEFAULT_SCORE;
    let mut notes = vec![format!("age {age} months")];

    if memory.metadata.has_flag(BLURRY_FLAG) {
        action = Action::LowRelevance;
        notes.push("blurry image".to_string());
    }
    if is_sentimental(memory) {
        attachment = attachment.max(SENTIMENTAL_ATTACHMENT);
        if action.is_demoting() {
            action = Action::Compress;
        }
        notes.push("sentimental tag".to_string());
    }

    Analysis {
        relevance_1_month: r1m,
        relevance_1_year: r1y,
        attachment,
        action,
        sentiment: Sentiment::neutral(),
        confidence: HEURISTIC_CONFIDENCE,
        explanation: format!("Heuristic analysis (completion service unavailable): {}.", notes.join(", ")),
        summary: String::new(),
        model_derived: false,
        analyzed_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use garden_core::memory::MemoryKind;

    fn aged(months: i64) -> Memory {
        let now = Utc::now();
        Memory::new("h", MemoryKind::Image, "img", 1, now - Duration::days(months * 30 + 1))
    }

    #[test]
    fn age_curve_drives_action() {
        let now = Utc::now();
        assert_eq!(heuristic_analysis(&aged(2), now).action, Action::Keep);
        assert_eq!(heuristic_analysis(&aged(18), now).action, Action::Keep);
        assert_eq!(heuristic_analysis(&aged(30), now).action, Action::Compress);
        assert_eq!(heuristic_analysis(&aged(40), now).action, Action::LowRelevance);
    }

    #[test]
    fn curve_values() {
        let now = Utc::now();
        let a = heuristic_analysis(&aged(40), now);
        assert_eq!((a.relevance_1_month, a.relevance_1_year), (0.2, 0.1));
        assert_eq!(a.confidence, 0.4);
        assert!(!a.model_derived);
    }

    #[test]
    fn blurry_forces_low_relevance_even_when_recent() {
        let mut m = aged(2);
        m.metadata.flags.push("blurry".into());
        let a = heuristic_analysis(&m, Utc::now());
        assert_eq!(a.action, Action::LowRelevance);
        assert!(a.explanation.contains("blurry"));
    }

    #[test]
    fn sentimental_tags_protect_and_raise_attachment() {
        let mut m = aged(48);
        m.metadata.flags.push("blurry".into());
        m.tags = vec!["Wedding".into()];
        let a = heuristic_analysis(&m, Utc::now());
        assert_eq!(a.action, Action::Compress);
        assert_eq!(a.attachment, 0.9);
    }

    #[test]
    fn sentimental_tags_leave_keep_alone() {
        let mut m = aged(1);
        m.tags = vec!["family".into()];
        assert_eq!(heuristic_analysis(&m, Utc::now()).action, Action::Keep);
    }
}
