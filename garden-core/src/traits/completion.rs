use async_trait::async_trait;

use crate::errors::ClassifierError;
use crate::models::CompletionRequest;

/// An external generative completion service.
#[async_trait]
pub trait ICompletionBackend: Send + Sync {
    /// Return the raw completion text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ClassifierError>;

    /// Backend name, used in logs and degradation events.
    fn name(&self) -> &str;

    /// Whether a credential is available. Unconfigured backends are never called.
    fn is_configured(&self) -> bool;
}
