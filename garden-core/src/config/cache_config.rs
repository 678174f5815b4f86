use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::{GardenError, GardenResult};

/// Analysis cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries older than this are treated as absent. At most ten years.
    pub ttl_secs: u64,
    /// L1 in-memory cache max entries.
    pub l1_capacity: u64,
    /// Enable the durable L2 tier.
    pub l2_enabled: bool,
}

impl CacheConfig {
    /// The TTL, clamped to [`defaults::MAX_CACHE_TTL_SECS`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs.min(defaults::MAX_CACHE_TTL_SECS))
    }

    pub fn validate(&self) -> GardenResult<()> {
        if self.ttl_secs > defaults::MAX_CACHE_TTL_SECS {
            return Err(GardenError::ConfigError(format!(
                "cache.ttl_secs = {} exceeds the maximum of {}",
                self.ttl_secs,
                defaults::MAX_CACHE_TTL_SECS
            )));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
            l1_capacity: defaults::DEFAULT_L1_CAPACITY,
            l2_enabled: defaults::DEFAULT_L2_ENABLED,
        }
    }
}
