use serde::{Deserialize, Serialize};

/// What the classifier asks of a completion backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Fingerprint-derived seed, for reproducible sampling.
    pub seed: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}
