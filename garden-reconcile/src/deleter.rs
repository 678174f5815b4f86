//! Deletion through reconciled buckets, legacy clusters, or single ids.
//!
//! Every deleted memory leaves a tombstone in the oblivion log. Removing a
//! stored upload is best-effort: a failure is logged and the deletion
//! proceeds.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use garden_core::errors::{GardenError, GardenResult, StorageError};
use garden_core::memory::{Action, Memory};
use garden_core::models::{ClusterId, DeletionReport, Tombstone};
use garden_core::traits::{IArtifactStore, IClusterRecordStore, IMemoryStore, IOblivionLog};
use garden_observability::deletion_span;
use garden_observability::tracing_setup::events;
use tracing::{debug, warn};

use crate::legacy::{load_legacy_records, rewrite_records, without_member, RecordEdit};
use crate::reconciler::{effective_action, reconcile, LegacyHints};

pub struct CascadingDeleter {
    memories: Arc<dyn IMemoryStore>,
    records: Arc<dyn IClusterRecordStore>,
    oblivion: Arc<dyn IOblivionLog>,
    artifacts: Option<Arc<dyn IArtifactStore>>,
}

impl CascadingDeleter {
    pub fn new(
        memories: Arc<dyn IMemoryStore>,
        records: Arc<dyn IClusterRecordStore>,
        oblivion: Arc<dyn IOblivionLog>,
    ) -> Self {
        Self {
            memories,
            records,
            oblivion,
            artifacts: None,
        }
    }

    /// Also remove stored uploads of deleted memories.
    pub fn with_artifacts(mut self, artifacts: Arc<dyn IArtifactStore>) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Delete every memory currently resolving to `action`, then purge the
    /// legacy records whose action is `action`.
    pub fn delete_bucket(&self, action: Action) -> GardenResult<DeletionReport> {
        let _span = deletion_span!(ClusterId::Bucket(action)).entered();
        let all = self.memories.list_all()?;
        let legacy = load_legacy_records(Some(self.records.as_ref()));
        let clusters = reconcile(&all, &legacy);
        let members: HashSet<&str> = clusters[action.index()]
            .memory_ids
            .iter()
            .map(String::as_str)
            .collect();

        let mut report = DeletionReport::default();
        for memory in all.iter().filter(|m| members.contains(m.id.as_str())) {
            if self.remove(memory, action)? {
                report.memories_deleted += 1;
            }
        }
        report.clusters_deleted = rewrite_records(self.records.as_ref(), |record, _| {
            if record.action == action {
                RecordEdit::Remove
            } else {
                RecordEdit::Keep
            }
        })?;

        events::bucket_deleted(action.as_str(), report.memories_deleted, report.clusters_deleted);
        Ok(report)
    }

    /// Buckets cascade as in `delete_bucket`. A legacy cluster deletes the
    /// memories it lists and then the record itself.
    pub fn delete_cluster(&self, id: &ClusterId) -> GardenResult<DeletionReport> {
        let legacy_id = match id {
            ClusterId::Bucket(action) => return self.delete_bucket(*action),
            ClusterId::Legacy(legacy_id) => legacy_id,
        };
        let _span = deletion_span!(id).entered();
        let legacy = load_legacy_records(Some(self.records.as_ref()));
        let Some(record) = legacy.iter().find(|r| &r.id == legacy_id) else {
            return Err(GardenError::ClusterNotFound { id: id.to_string() });
        };
        let hints = LegacyHints::from_records(&legacy);

        let mut report = DeletionReport::default();
        for memory_id in &record.memory_ids {
            let Some(memory) = self.load(memory_id)? else {
                continue;
            };
            let (bucket, _) = effective_action(&memory, &hints);
            if self.remove(&memory, bucket)? {
                report.memories_deleted += 1;
            }
        }
        report.clusters_deleted = rewrite_records(self.records.as_ref(), |candidate, _| {
            if &candidate.id == legacy_id {
                RecordEdit::Remove
            } else {
                RecordEdit::Keep
            }
        })?;
        Ok(report)
    }

    /// Delete one memory. The tombstone records the bucket it resolved to.
    /// A stored row that no longer decodes is still deleted by id.
    pub fn delete_memory(&self, memory_id: &str) -> GardenResult<Tombstone> {
        let _span = deletion_span!(memory_id).entered();
        let memory = self
            .load(memory_id)?
            .ok_or_else(|| GardenError::MemoryNotFound { id: memory_id.to_string() })?;
        let hints = LegacyHints::from_records(&load_legacy_records(Some(self.records.as_ref())));
        let (bucket, _) = effective_action(&memory, &hints);
        let tombstone = self.tombstone(&memory, bucket);
        self.oblivion.append(&tombstone)?;
        self.memories.delete(memory_id)?;
        self.remove_artifact(&memory);
        events::memory_deleted(memory_id, bucket.as_str());
        Ok(tombstone)
    }

    /// Detach one memory from a cluster without deleting it: its cluster
    /// reference fields are cleared, and a legacy cluster stops listing it.
    pub fn remove_memory_from_cluster(&self, cluster_id: &ClusterId, memory_id: &str) -> GardenResult<Memory> {
        let mut memory = self
            .memories
            .get(memory_id)?
            .ok_or_else(|| GardenError::MemoryNotFound { id: memory_id.to_string() })?;
        if let ClusterId::Legacy(legacy_id) = cluster_id {
            rewrite_records(self.records.as_ref(), |record, raw| {
                if &record.id == legacy_id && record.memory_ids.iter().any(|id| id == memory_id) {
                    RecordEdit::Replace(without_member(raw, memory_id))
                } else {
                    RecordEdit::Keep
                }
            })?;
        }
        memory.cluster = None;
        memory.cluster_name = None;
        self.memories.update(&memory)?;
        Ok(memory)
    }

    fn tombstone(&self, memory: &Memory, bucket: Action) -> Tombstone {
        Tombstone {
            id: memory.id.clone(),
            summary: memory.summary.clone(),
            bucket,
            deleted_at: Utc::now(),
        }
    }

    /// Fetch a memory, falling back to the listed stand-in when its row no
    /// longer decodes.
    fn load(&self, memory_id: &str) -> GardenResult<Option<Memory>> {
        match self.memories.get(memory_id) {
            Err(GardenError::StorageError(StorageError::Corrupt { .. })) => Ok(self
                .memories
                .list_all()?
                .into_iter()
                .find(|m| m.id == memory_id)),
            other => other,
        }
    }

    /// The tombstone is written before the row goes, so a failed append
    /// leaves the memory in place. Returns false if the memory was already
    /// gone.
    fn remove(&self, memory: &Memory, bucket: Action) -> GardenResult<bool> {
        self.oblivion.append(&self.tombstone(memory, bucket))?;
        if !self.memories.delete(&memory.id)? {
            debug!(memory_id = %memory.id, "memory already removed");
            return Ok(false);
        }
        self.remove_artifact(memory);
        events::memory_deleted(&memory.id, bucket.as_str());
        Ok(true)
    }

    fn remove_artifact(&self, memory: &Memory) {
        let (Some(artifacts), Some(stored)) = (&self.artifacts, memory.metadata.stored_filename.as_deref()) else {
            return;
        };
        if let Err(e) = artifacts.remove(stored) {
            warn!(memory_id = %memory.id, artifact = %stored, error = %e, "artifact removal failed");
        }
    }
}
