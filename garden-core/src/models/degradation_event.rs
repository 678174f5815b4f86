use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emitted whenever a component falls back to a lower-quality mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}
