//! # garden-cache
//!
//! Analysis cache keyed by content fingerprint.
//! L1 (moka in-memory) → L2 (SQLite, survives restarts). Entries older than
//! the TTL read as absent and are evicted from both tiers.

mod coordinator;
pub mod l1_memory;
pub mod l2_sqlite;

pub use coordinator::{CacheCoordinator, CacheHitTier};
pub use l1_memory::L1MemoryCache;
pub use l2_sqlite::L2SqliteCache;

use chrono::{DateTime, Utc};
use garden_core::Analysis;
use serde::{Deserialize, Serialize};

/// A cached verdict and the moment it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedAnalysis {
    pub analysis: Analysis,
    pub cached_at: DateTime<Utc>,
}

impl CachedAnalysis {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.cached_at) < ttl
    }
}
