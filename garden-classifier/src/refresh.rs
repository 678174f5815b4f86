//! Re-classification of stored memories whose verdicts have gone stale.

use chrono::{DateTime, Utc};
use garden_core::errors::GardenResult;
use garden_core::memory::Memory;
use garden_core::traits::IMemoryStore;
use tracing::{info, warn};

use crate::pipeline::AnalysisPipeline;

/// No verdict, a heuristic verdict, or one older than `window`.
///
/// Overrides are not consulted: an overridden memory still gets a fresh
/// verdict, and keeps its override.
pub fn needs_refresh(memory: &Memory, window: chrono::Duration, now: DateTime<Utc>) -> bool {
    match &memory.analysis {
        None => true,
        Some(analysis) => !analysis.model_derived || !analysis.is_fresh(now, window),
    }
}

/// Re-classify stale memories and persist model-derived results.
///
/// Returns the number of memories updated. Does nothing when no credential
/// is configured. Rows that no longer decode are left untouched. Heuristic results are not written back, so an existing
/// model verdict is never replaced by a heuristic one.
pub async fn refresh_stale(store: &dyn IMemoryStore, pipeline: &AnalysisPipeline) -> GardenResult<usize> {
    if !pipeline.classifier().is_configured() {
        warn!("completion credential not configured, skipping analysis refresh");
        return Ok(0);
    }

    let now = Utc::now();
    let window = pipeline.classifier().config().refresh_window();
    let mut stale: Vec<Memory> = store
        .list_all()?
        .into_iter()
        .filter(|m| !m.is_unreadable() && needs_refresh(m, window, now))
        .collect();
    if stale.is_empty() {
        return Ok(0);
    }

    let results = pipeline.analyze_batch(&stale).await;
    let mut refreshed = 0;
    for (memory, result) in stale.iter_mut().zip(results) {
        if !result.analysis.model_derived {
            continue;
        }
        memory.attach_analysis(result.analysis);
        store.update(memory)?;
        refreshed += 1;
    }
    info!(candidates = stale.len(), refreshed, "stale analyses refreshed");
    Ok(refreshed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use garden_core::memory::{Analysis, MemoryKind};

    #[test]
    fn staleness_rules() {
        let now = Utc::now();
        let window = Duration::days(7);
        let mut m = Memory::new("m", MemoryKind::Text, "s", 1, now);
        assert!(needs_refresh(&m, window, now));

        m.analysis = Some(Analysis {
            model_derived: false,
            analyzed_at: now,
            ..Default::default()
        });
        assert!(needs_refresh(&m, window, now));

        m.analysis = Some(Analysis {
            model_derived: true,
            analyzed_at: now - Duration::days(7),
            ..Default::default()
        });
        assert!(needs_refresh(&m, window, now));

        m.analysis = Some(Analysis {
            model_derived: true,
            analyzed_at: now - Duration::days(6),
            ..Default::default()
        });
        assert!(!needs_refresh(&m, window, now));
    }
}
