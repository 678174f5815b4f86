use chrono::{DateTime, Utc};

use super::base::Memory;

/// Where a memory sits in the classification lifecycle.
///
/// Derived on demand from the stored record; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationState {
    /// No analysis, or the analysis is older than the TTL.
    Unanalyzed,
    /// A fresh analysis is attached.
    Analyzed { model_derived: bool },
    /// The user has pinned an action.
    Overridden,
}

impl ClassificationState {
    pub fn of(memory: &Memory, ttl: chrono::Duration, now: DateTime<Utc>) -> Self {
        if memory.override_action.is_some() {
            return Self::Overridden;
        }
        match &memory.analysis {
            Some(analysis) if analysis.is_fresh(now, ttl) => Self::Analyzed {
                model_derived: analysis.model_derived,
            },
            _ => Self::Unanalyzed,
        }
    }

    /// Unanalyzed memories and heuristic verdicts are eligible for another
    /// classification attempt.
    pub fn needs_classification(&self) -> bool {
        matches!(
            self,
            Self::Unanalyzed
                | Self::Analyzed {
                    model_derived: false
                }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Action, Analysis, MemoryKind};
    use chrono::Duration;

    fn memory() -> Memory {
        Memory::new("m1", MemoryKind::Text, "note", 10, Utc::now())
    }

    #[test]
    fn transitions() {
        let now = Utc::now();
        let ttl = Duration::days(7);
        let mut m = memory();
        assert_eq!(ClassificationState::of(&m, ttl, now), ClassificationState::Unanalyzed);

        m.attach_analysis(Analysis {
            model_derived: true,
            analyzed_at: now - Duration::days(1),
            ..Default::default()
        });
        assert_eq!(
            ClassificationState::of(&m, ttl, now),
            ClassificationState::Analyzed { model_derived: true }
        );

        m.override_action = Some(Action::Delete);
        assert_eq!(ClassificationState::of(&m, ttl, now), ClassificationState::Overridden);

        m.override_action = None;
        assert_eq!(
            ClassificationState::of(&m, ttl, now + Duration::days(10)),
            ClassificationState::Unanalyzed
        );
    }

    #[test]
    fn heuristic_verdicts_are_reclassified() {
        assert!(ClassificationState::Analyzed { model_derived: false }.needs_classification());
        assert!(!ClassificationState::Analyzed { model_derived: true }.needs_classification());
        assert!(!ClassificationState::Overridden.needs_classification());
    }
}
