//! # garden-reconcile
//!
//! Recomputes the four action buckets from the memory set, reading legacy
//! cluster records defensively, and deletes through them: whole buckets,
//! legacy clusters, or single memories, each leaving a tombstone.

pub mod deleter;
pub mod legacy;
pub mod overrides;
pub mod reconciler;

pub use deleter::CascadingDeleter;
pub use legacy::{load_legacy_records, migrate_payload, migrate_record};
pub use overrides::{clear_override, set_override};
pub use reconciler::{effective_action, reconcile, reconcile_store, ActionSource, LegacyHints};
