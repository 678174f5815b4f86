//! L1 in-memory cache using moka. Fastest tier.

use std::time::Duration;

use moka::sync::Cache;

use crate::CachedAnalysis;

/// Keys are fingerprint hex strings.
pub struct L1MemoryCache {
    cache: Cache<String, CachedAnalysis>,
}

impl L1MemoryCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    pub fn get(&self, fingerprint: &str) -> Option<CachedAnalysis> {
        self.cache.get(fingerprint)
    }

    pub fn insert(&self, fingerprint: String, entry: CachedAnalysis) {
        self.cache.insert(fingerprint, entry);
    }

    pub fn invalidate(&self, fingerprint: &str) {
        self.cache.invalidate(fingerprint);
    }

    /// Approximate entry count; moka applies pending writes lazily.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
