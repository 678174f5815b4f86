//! Recent fallbacks to a lower-quality mode, with their recovery status.
//!
//! History is bounded: past `capacity` entries, recovered entries are
//! dropped first, then the oldest active ones.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use garden_core::config::defaults::DEFAULT_DEGRADATION_HISTORY;
use garden_core::models::DegradationEvent;
use serde::{Deserialize, Serialize};

use crate::tracing_setup::events;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct DegradationTracker {
    events: VecDeque<TrackedDegradation>,
    capacity: usize,
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_DEGRADATION_HISTORY)
    }
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(DEFAULT_DEGRADATION_HISTORY)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&mut self, event: DegradationEvent) {
        events::degradation_triggered(&event.component, &event.failure, &event.fallback_used);
        self.events.push_back(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
        while self.events.len() > self.capacity {
            let recovered = self
                .events
                .iter()
                .position(|t| t.recovery_status == RecoveryStatus::Recovered);
            match recovered {
                Some(pos) => {
                    self.events.remove(pos);
                }
                None => {
                    self.events.pop_front();
                }
            }
        }
    }

    /// Mark every active degradation of `component` as recovered.
    /// Returns how many were closed.
    pub fn mark_recovered(&mut self, component: &str) -> usize {
        let Some(degraded_for) = self.degraded_duration(component) else {
            return 0;
        };
        let now = Utc::now();
        let mut closed = 0;
        for tracked in self.events.iter_mut() {
            if tracked.event.component == component
                && tracked.recovery_status == RecoveryStatus::Active
            {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(now);
                closed += 1;
            }
        }
        events::component_recovered(component, degraded_for.num_milliseconds());
        closed
    }

    pub fn events(&self) -> &VecDeque<TrackedDegradation> {
        &self.events
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        })
    }

    /// How long a component has been continuously degraded.
    pub fn degraded_duration(&self, component: &str) -> Option<chrono::Duration> {
        let earliest = self
            .events
            .iter()
            .filter(|t| {
                t.event.component == component && t.recovery_status == RecoveryStatus::Active
            })
            .map(|t| t.event.timestamp)
            .min()?;
        Some(Utc::now() - earliest)
    }
}
