use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::{GardenError, GardenResult};

/// Classifier and completion-service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Bearer credential. Usually supplied through `NEMOTRON_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible endpoint.
    pub api_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Memories classified concurrently per window.
    pub batch_size: usize,
    /// Pause between windows, for rate-limit courtesy.
    pub batch_delay_ms: u64,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    pub temperature: f64,
    pub top_p: f64,
    pub max_output_tokens: u32,
    /// Characters of raw content embedded in the prompt.
    pub content_preview_chars: usize,
    /// Explanations shorter than this are replaced with a synthesized one.
    pub min_explanation_chars: usize,
    /// Model-derived analyses older than this are refreshed.
    pub refresh_days: u64,
}

impl ClassifierConfig {
    /// Overlay `NEMOTRON_*` environment variables.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup (used by tests).
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("NEMOTRON_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("NEMOTRON_API_URL").filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(model) = lookup("NEMOTRON_MODEL").filter(|m| !m.trim().is_empty()) {
            self.model = model;
        }
        if let Some(days) = lookup("NEMOTRON_REFRESH_DAYS").and_then(|d| d.trim().parse().ok()) {
            self.refresh_days = days;
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    /// Clamped to [`defaults::MAX_REFRESH_DAYS`].
    pub fn refresh_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_days.min(defaults::MAX_REFRESH_DAYS) as i64)
    }

    pub fn validate(&self) -> GardenResult<()> {
        if self.refresh_days > defaults::MAX_REFRESH_DAYS {
            return Err(GardenError::ConfigError(format!(
                "classifier.refresh_days = {} exceeds the maximum of {}",
                self.refresh_days,
                defaults::MAX_REFRESH_DAYS
            )));
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: defaults::DEFAULT_API_URL.to_string(),
            model: defaults::DEFAULT_MODEL.to_string(),
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            batch_delay_ms: defaults::DEFAULT_BATCH_DELAY_MS,
            request_timeout_secs: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
            temperature: defaults::DEFAULT_TEMPERATURE,
            top_p: defaults::DEFAULT_TOP_P,
            max_output_tokens: defaults::DEFAULT_MAX_OUTPUT_TOKENS,
            content_preview_chars: defaults::DEFAULT_CONTENT_PREVIEW_CHARS,
            min_explanation_chars: defaults::DEFAULT_MIN_EXPLANATION_CHARS,
            refresh_days: defaults::DEFAULT_REFRESH_DAYS,
        }
    }
}
