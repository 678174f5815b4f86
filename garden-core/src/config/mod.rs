//! Configuration. Every section is `serde(default)`, so partial TOML works.

mod cache_config;
mod classifier_config;
pub mod defaults;
mod observability_config;
mod storage_config;

pub use cache_config::CacheConfig;
pub use classifier_config::ClassifierConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{GardenError, GardenResult};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub classifier: ClassifierConfig,
    pub observability: ObservabilityConfig,
}

impl GardenConfig {
    /// Parse a (possibly partial) TOML document. Out-of-range durations are
    /// rejected.
    pub fn from_toml(source: &str) -> GardenResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| GardenError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML, then overlay the classifier's environment variables.
    pub fn from_toml_with_env(source: &str) -> GardenResult<Self> {
        let mut config = Self::from_toml(source)?;
        config.classifier.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GardenResult<()> {
        self.cache.validate()?;
        self.classifier.validate()
    }
}
