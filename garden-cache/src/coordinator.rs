use chrono::{DateTime, Utc};
use garden_core::config::CacheConfig;
use garden_core::errors::GardenResult;
use garden_core::{Analysis, Fingerprint};
use garden_observability::cache_span;
use tracing::{debug, warn};

use crate::l1_memory::L1MemoryCache;
use crate::l2_sqlite::L2SqliteCache;
use crate::CachedAnalysis;

/// Which tier served a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHitTier {
    L1,
    L2,
    Miss,
}

/// Orchestrates lookups across both tiers.
///
/// Constructed once and shared (`Arc`) by every caller. Reads are safe from
/// any thread; concurrent writes to one fingerprint are last-write-wins.
pub struct CacheCoordinator {
    l1: L1MemoryCache,
    l2: Option<L2SqliteCache>,
    ttl: chrono::Duration,
}

impl CacheCoordinator {
    /// L1 only. Nothing survives a restart.
    pub fn in_memory(config: &CacheConfig) -> Self {
        Self {
            l1: L1MemoryCache::new(config.l1_capacity, config.ttl()),
            l2: None,
            ttl: chrono::Duration::seconds(config.ttl().as_secs() as i64),
        }
    }

    /// L1 over the given durable tier. Ignores `l2_enabled`.
    pub fn with_l2(config: &CacheConfig, l2: L2SqliteCache) -> Self {
        Self {
            l2: Some(l2),
            ..Self::in_memory(config)
        }
    }

    /// Open the durable tier at `path` when `l2_enabled`, otherwise L1 only.
    pub fn open(config: &CacheConfig, path: &std::path::Path) -> GardenResult<Self> {
        if config.l2_enabled {
            Ok(Self::with_l2(config, L2SqliteCache::open(path)?))
        } else {
            Ok(Self::in_memory(config))
        }
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    pub fn l1(&self) -> &L1MemoryCache {
        &self.l1
    }

    pub fn l2(&self) -> Option<&L2SqliteCache> {
        self.l2.as_ref()
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> (Option<Analysis>, CacheHitTier) {
        self.get_at(fingerprint, Utc::now())
    }

    /// Look up a fingerprint as of `now`.
    ///
    /// A fresh L2 hit is promoted into L1. A stale entry in either tier is
    /// evicted from both and reported as a miss.
    pub fn get_at(
        &self,
        fingerprint: &Fingerprint,
        now: DateTime<Utc>,
    ) -> (Option<Analysis>, CacheHitTier) {
        let _span = cache_span!("get", fingerprint).entered();
        let key = fingerprint.as_str();

        if let Some(entry) = self.l1.get(key) {
            if entry.is_fresh(now, self.ttl) {
                debug!(tier = "L1", "cache hit");
                return (Some(entry.analysis), CacheHitTier::L1);
            }
            debug!(tier = "L1", "stale entry");
            self.invalidate(fingerprint);
            return (None, CacheHitTier::Miss);
        }

        if let Some(l2) = &self.l2 {
            if let Some(entry) = l2.get(key) {
                if entry.is_fresh(now, self.ttl) {
                    debug!(tier = "L2", "cache hit");
                    let analysis = entry.analysis.clone();
                    self.l1.insert(key.to_string(), entry);
                    return (Some(analysis), CacheHitTier::L2);
                }
                debug!(tier = "L2", "stale entry");
                self.invalidate(fingerprint);
            }
        }

        (None, CacheHitTier::Miss)
    }

    pub fn put(&self, fingerprint: &Fingerprint, analysis: &Analysis) {
        self.put_at(fingerprint, analysis, Utc::now());
    }

    /// Write through both tiers, stamped `cached_at`. A failed durable write
    /// is logged; the L1 entry still stands.
    pub fn put_at(&self, fingerprint: &Fingerprint, analysis: &Analysis, cached_at: DateTime<Utc>) {
        let _span = cache_span!("put", fingerprint).entered();
        let entry = CachedAnalysis {
            analysis: analysis.clone(),
            cached_at,
        };
        if let Some(l2) = &self.l2 {
            if let Err(e) = l2.insert(fingerprint.as_str(), &entry) {
                warn!(error = %e, "L2 cache write failed");
            }
        }
        self.l1.insert(fingerprint.as_str().to_string(), entry);
    }

    /// Drop a fingerprint from both tiers.
    pub fn invalidate(&self, fingerprint: &Fingerprint) {
        self.l1.invalidate(fingerprint.as_str());
        if let Some(l2) = &self.l2 {
            if let Err(e) = l2.remove(fingerprint.as_str()) {
                warn!(error = %e, "L2 cache eviction failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_core::Action;

    fn coordinator() -> CacheCoordinator {
        let config = CacheConfig::default();
        CacheCoordinator::with_l2(&config, L2SqliteCache::open_in_memory().unwrap())
    }

    fn analysis(action: Action) -> Analysis {
        Analysis {
            action,
            ..Default::default()
        }
    }

    fn fp(s: &str) -> Fingerprint {
        Fingerprint::from_hex(s)
    }

    #[test]
    fn miss_on_empty() {
        let (result, tier) = coordinator().get(&fp("nothing"));
        assert!(result.is_none());
        assert_eq!(tier, CacheHitTier::Miss);
    }

    #[test]
    fn put_writes_both_tiers() {
        let coord = coordinator();
        coord.put(&fp("h1"), &analysis(Action::Compress));
        assert!(coord.l1().get("h1").is_some());
        assert!(coord.l2().unwrap().get("h1").is_some());
        assert_eq!(coord.get(&fp("h1")).1, CacheHitTier::L1);
    }

    #[test]
    fn l2_hit_promotes_to_l1() {
        let coord = coordinator();
        let entry = CachedAnalysis {
            analysis: analysis(Action::Delete),
            cached_at: Utc::now(),
        };
        coord.l2().unwrap().insert("h2", &entry).unwrap();

        let (result, tier) = coord.get(&fp("h2"));
        assert_eq!(result.unwrap().action, Action::Delete);
        assert_eq!(tier, CacheHitTier::L2);

        let (_, tier) = coord.get(&fp("h2"));
        assert_eq!(tier, CacheHitTier::L1);
    }

    #[test]
    fn stale_entries_are_evicted_from_both_tiers() {
        let coord = coordinator();
        let now = Utc::now();
        coord.put_at(&fp("h3"), &analysis(Action::Keep), now - chrono::Duration::days(8));

        let (result, tier) = coord.get_at(&fp("h3"), now);
        assert!(result.is_none());
        assert_eq!(tier, CacheHitTier::Miss);
        assert!(coord.l1().get("h3").is_none());
        assert!(coord.l2().unwrap().get("h3").is_none());
    }

    #[test]
    fn entry_just_inside_ttl_is_served() {
        let coord = coordinator();
        let now = Utc::now();
        coord.put_at(&fp("h4"), &analysis(Action::Keep), now - chrono::Duration::days(6));
        assert_eq!(coord.get_at(&fp("h4"), now).1, CacheHitTier::L1);
    }
}
