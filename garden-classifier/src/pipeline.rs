//! Batch analysis with cache integration.
//!
//! Memories are fingerprinted and looked up in the cache. Distinct
//! fingerprints that miss are classified in windows of `batch_size`
//! concurrent calls with a fixed pause between windows. One failure never
//! affects the rest of the batch: it degrades that memory to the heuristic.
//! Only model-derived verdicts are cached, so heuristic ones are retried on
//! the next run.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use garden_cache::{CacheCoordinator, CacheHitTier};
use garden_core::memory::{Analysis, Memory};
use garden_core::models::DegradationEvent;
use garden_core::Fingerprint;
use garden_observability::DegradationTracker;
use tracing::{debug, info};

use crate::engine::{Classification, Classifier};
use crate::heuristic::heuristic_analysis;

const COMPONENT: &str = "classifier";
const FALLBACK: &str = "heuristic";

/// Where an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Cache(CacheHitTier),
    Model,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedMemory {
    pub memory_id: String,
    pub fingerprint: Fingerprint,
    pub analysis: Analysis,
    pub source: AnalysisSource,
}

/// Undrained events are capped at the tracker's capacity, oldest dropped.
#[derive(Default)]
struct DegradationState {
    tracker: DegradationTracker,
    undrained: VecDeque<DegradationEvent>,
}

pub struct AnalysisPipeline {
    classifier: Classifier,
    cache: Arc<CacheCoordinator>,
    degradation: Mutex<DegradationState>,
}

impl AnalysisPipeline {
    pub fn new(classifier: Classifier, cache: Arc<CacheCoordinator>) -> Self {
        Self {
            classifier,
            cache,
            degradation: Mutex::new(DegradationState::default()),
        }
    }

    /// Keep at most `capacity` degradation entries and undrained events.
    pub fn with_degradation_history(mut self, capacity: usize) -> Self {
        self.degradation = Mutex::new(DegradationState {
            tracker: DegradationTracker::with_capacity(capacity),
            undrained: VecDeque::new(),
        });
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn cache(&self) -> &CacheCoordinator {
        &self.cache
    }

    fn degradation(&self) -> MutexGuard<'_, DegradationState> {
        self.degradation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn analyze(&self, memory: &Memory) -> AnalyzedMemory {
        let mut results = self.analyze_batch(std::slice::from_ref(memory)).await;
        results.swap_remove(0)
    }

    /// Analyze every memory; the result is in input order, one per memory.
    pub async fn analyze_batch(&self, memories: &[Memory]) -> Vec<AnalyzedMemory> {
        let now = Utc::now();
        let fingerprints: Vec<Fingerprint> = memories.iter().map(Fingerprint::of).collect();

        let mut cached: HashMap<&Fingerprint, (Analysis, CacheHitTier)> = HashMap::new();
        let mut seen: HashSet<&Fingerprint> = HashSet::new();
        let mut misses: Vec<usize> = Vec::new();
        for (idx, fp) in fingerprints.iter().enumerate() {
            if !seen.insert(fp) {
                continue;
            }
            match self.cache.get_at(fp, now) {
                (Some(analysis), tier) => {
                    cached.insert(fp, (analysis, tier));
                }
                (None, _) => misses.push(idx),
            }
        }

        let window_size = self.classifier.config().batch_size.max(1);
        let delay = self.classifier.config().batch_delay();
        let mut classified: HashMap<&Fingerprint, Classification> = HashMap::new();
        for (n, window) in misses.chunks(window_size).enumerate() {
            if n > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let outcomes = join_all(window.iter().map(|&idx| {
                self.classifier
                    .classify_with(&memories[idx], &fingerprints[idx], now)
            }))
            .await;
            for (&idx, outcome) in window.iter().zip(outcomes) {
                self.settle(&memories[idx], &fingerprints[idx], &outcome, now);
                classified.insert(&fingerprints[idx], outcome);
            }
        }

        let mut degraded = 0;
        let mut first_seen: HashSet<&Fingerprint> = HashSet::new();
        let mut results = Vec::with_capacity(memories.len());
        for (memory, fp) in memories.iter().zip(&fingerprints) {
            let duplicate = !first_seen.insert(fp);
            let (analysis, source) = match (cached.get(fp), classified.get(fp)) {
                (Some((analysis, tier)), _) => (analysis.clone(), AnalysisSource::Cache(*tier)),
                (None, Some(outcome)) if outcome.failure.is_some() => {
                    degraded += 1;
                    (outcome.analysis.clone(), AnalysisSource::Heuristic)
                }
                // Later copies of a fingerprint read the verdict back from the cache.
                (None, Some(outcome)) if duplicate => match self.cache.get_at(fp, now) {
                    (Some(analysis), tier) => (analysis, AnalysisSource::Cache(tier)),
                    (None, _) => (outcome.analysis.clone(), AnalysisSource::Model),
                },
                (None, Some(outcome)) => (outcome.analysis.clone(), AnalysisSource::Model),
                // Not reached: every fingerprint was looked up or classified.
                (None, None) => (heuristic_analysis(memory, now), AnalysisSource::Heuristic),
            };
            results.push(AnalyzedMemory {
                memory_id: memory.id.clone(),
                fingerprint: fp.clone(),
                analysis,
                source,
            });
        }

        info!(
            total = memories.len(),
            cache_hits = cached.len(),
            classified = misses.len(),
            degraded,
            "batch analyzed"
        );
        results
    }

    /// Cache model verdicts; record degradations.
    fn settle(&self, memory: &Memory, fp: &Fingerprint, outcome: &Classification, now: DateTime<Utc>) {
        match &outcome.failure {
            None => {
                self.cache.put(fp, &outcome.analysis);
                self.degradation().tracker.mark_recovered(COMPONENT);
            }
            Some(failure) => {
                debug!(memory_id = %memory.id, "heuristic verdict not cached");
                let event = DegradationEvent {
                    component: COMPONENT.to_string(),
                    failure: failure.to_string(),
                    fallback_used: FALLBACK.to_string(),
                    timestamp: now,
                };
                let mut state = self.degradation();
                state.tracker.record(event.clone());
                if state.undrained.len() >= state.tracker.capacity() {
                    state.undrained.pop_front();
                }
                state.undrained.push_back(event);
            }
        }
    }

    /// Analyze and attach the verdicts to the memories in place.
    pub async fn analyze_in_place(&self, memories: &mut [Memory]) -> Vec<AnalyzedMemory> {
        let results = self.analyze_batch(memories).await;
        for (memory, result) in memories.iter_mut().zip(&results) {
            memory.attach_analysis(result.analysis.clone());
        }
        results
    }

    /// Degradation events recorded since the last drain, up to the tracker's
    /// capacity.
    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        self.degradation().undrained.drain(..).collect()
    }

    /// Whether the most recent classification attempts are degraded.
    pub fn is_degraded(&self) -> bool {
        self.degradation().tracker.is_degraded(COMPONENT)
    }
}
