//! Recomputation of the four action buckets.
//!
//! Each memory resolves to exactly one action, by precedence:
//! user override, then the memory's own verdict, then the first legacy
//! record listing it, then keep. Reconciliation is pure: the same inputs
//! always give the same buckets, in `Action::ALL` order, with memory ids in
//! input order and totals summed from the memories themselves.

use std::collections::{HashMap, HashSet};

use garden_core::errors::GardenResult;
use garden_core::memory::{Action, Memory};
use garden_core::models::{Cluster, ClusterRecord};
use garden_core::traits::{IClusterRecordStore, IMemoryStore};
use garden_observability::reconcile_span;
use tracing::debug;

use crate::legacy::load_legacy_records;

/// Which input decided a memory's effective action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSource {
    Override,
    Own,
    Legacy,
    Default,
}

/// Action hints from legacy records, keyed by memory id.
/// The first record to list a memory wins.
#[derive(Debug, Clone, Default)]
pub struct LegacyHints {
    by_memory: HashMap<String, Action>,
}

impl LegacyHints {
    pub fn from_records(records: &[ClusterRecord]) -> Self {
        let mut by_memory = HashMap::new();
        for record in records {
            for id in &record.memory_ids {
                by_memory.entry(id.clone()).or_insert(record.action);
            }
        }
        Self { by_memory }
    }

    pub fn get(&self, memory_id: &str) -> Option<Action> {
        self.by_memory.get(memory_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_memory.is_empty()
    }
}

pub fn effective_action(memory: &Memory, hints: &LegacyHints) -> (Action, ActionSource) {
    if let Some(action) = memory.override_action {
        return (action, ActionSource::Override);
    }
    if let Some(action) = memory.own_action() {
        return (action, ActionSource::Own);
    }
    if let Some(action) = hints.get(&memory.id) {
        return (action, ActionSource::Legacy);
    }
    (Action::Keep, ActionSource::Default)
}

/// Partition `memories` into the four buckets.
///
/// Ids listed only by legacy records are ignored; a memory id seen twice
/// counts once.
pub fn reconcile(memories: &[Memory], legacy: &[ClusterRecord]) -> Vec<Cluster> {
    let _span = reconcile_span!(memories.len(), legacy.len()).entered();
    let hints = LegacyHints::from_records(legacy);
    let mut buckets: Vec<Cluster> = Action::ALL.iter().map(|a| Cluster::empty(*a)).collect();
    let mut placed: HashSet<&str> = HashSet::with_capacity(memories.len());

    for memory in memories {
        if !placed.insert(memory.id.as_str()) {
            debug!(memory_id = %memory.id, "duplicate memory id ignored");
            continue;
        }
        let (action, source) = effective_action(memory, &hints);
        let bucket = &mut buckets[action.index()];
        bucket.memory_ids.push(memory.id.clone());
        bucket.total_size += memory.size;
        debug!(memory_id = %memory.id, action = %action, source = ?source, "memory placed");
    }
    for bucket in &mut buckets {
        bucket.size = bucket.memory_ids.len();
    }
    buckets
}

/// Reconcile the stored memory set against stored legacy records.
pub fn reconcile_store(
    memories: &dyn IMemoryStore,
    records: Option<&dyn IClusterRecordStore>,
) -> GardenResult<Vec<Cluster>> {
    let all = memories.list_all()?;
    let legacy = load_legacy_records(records);
    Ok(reconcile(&all, &legacy))
}
