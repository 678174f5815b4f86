//! Single-memory classification: model first, heuristic on any failure.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use garden_core::config::ClassifierConfig;
use garden_core::errors::ClassifierError;
use garden_core::memory::{Analysis, Memory};
use garden_core::models::{CompletionRequest, UserProfile};
use garden_core::traits::ICompletionBackend;
use garden_core::Fingerprint;
use garden_observability::classification_span;
use tracing::{debug, warn, Instrument};

use crate::heuristic::heuristic_analysis;
use crate::parse::{parse_completion, ParseMode};
use crate::prompt::PromptBuilder;
use crate::validate::validate;

/// Outcome of one classification. `analysis` is always usable; `failure`
/// says why it is heuristic, if it is.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub analysis: Analysis,
    pub failure: Option<ClassifierError>,
}

pub struct Classifier {
    backend: Arc<dyn ICompletionBackend>,
    prompts: PromptBuilder,
    config: ClassifierConfig,
    profile: Option<UserProfile>,
}

impl Classifier {
    pub fn new(backend: Arc<dyn ICompletionBackend>, config: ClassifierConfig) -> Self {
        Self {
            prompts: PromptBuilder::new(config.content_preview_chars),
            backend,
            config,
            profile: None,
        }
    }

    /// Enrich prompts with user context.
    pub fn with_profile(mut self, profile: Option<UserProfile>) -> Self {
        self.profile = profile;
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }

    pub async fn classify(&self, memory: &Memory) -> Classification {
        self.classify_with(memory, &Fingerprint::of(memory), Utc::now()).await
    }

    /// Classify with a precomputed fingerprint, as of `now`. Never fails.
    pub async fn classify_with(
        &self,
        memory: &Memory,
        fingerprint: &Fingerprint,
        now: DateTime<Utc>,
    ) -> Classification {
        let span = classification_span!(memory.id, fingerprint);
        async move {
            match self.ask_model(memory, fingerprint, now).await {
                Ok(analysis) => Classification {
                    analysis,
                    failure: None,
                },
                Err(failure) => {
                    warn!(error = %failure, kind = ?failure.kind(), "classification degraded to heuristic");
                    Classification {
                        analysis: heuristic_analysis(memory, now),
                        failure: Some(failure),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn ask_model(
        &self,
        memory: &Memory,
        fingerprint: &Fingerprint,
        now: DateTime<Utc>,
    ) -> Result<Analysis, ClassifierError> {
        if !self.backend.is_configured() {
            return Err(ClassifierError::MissingCredential);
        }
        let request = CompletionRequest {
            prompt: self.prompts.build(memory, self.profile.as_ref(), now),
            seed: fingerprint.seed(),
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_output_tokens,
        };

        let reply = tokio::time::timeout(self.config.request_timeout(), self.backend.complete(&request))
            .await
            .map_err(|_| ClassifierError::Timeout)??;

        let raw = parse_completion(&reply)?;
        if raw.mode == ParseMode::TextExtracted {
            debug!("no JSON object in reply, used text extraction");
        }
        Ok(validate(&raw.fields, memory, now, self.config.min_explanation_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_core::memory::{Action, MemoryKind};
    use test_fixtures::{model_response, ScriptedBackend};

    fn memory() -> Memory {
        Memory::new("m1", MemoryKind::Document, "tax return", 1000, Utc::now())
    }

    #[tokio::test]
    async fn model_verdict_is_validated() {
        let backend = Arc::new(ScriptedBackend::always(model_response("forget", 0.2, 0.1, 0.0)));
        let classifier = Classifier::new(backend.clone(), ClassifierConfig::default());
        let result = classifier.classify(&memory()).await;
        assert!(result.failure.is_none());
        assert!(result.analysis.model_derived);
        assert_eq!(result.analysis.action, Action::LowRelevance);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn request_carries_fingerprint_seed() {
        let backend = Arc::new(ScriptedBackend::always(model_response("keep", 0.9, 0.9, 0.5)));
        let classifier = Classifier::new(backend.clone(), ClassifierConfig::default());
        let m = memory();
        classifier.classify(&m).await;
        let request = &backend.requests()[0];
        assert_eq!(request.seed, Fingerprint::of(&m).seed());
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_tokens, 500);
    }

    #[tokio::test]
    async fn backend_failure_degrades() {
        let backend = Arc::new(ScriptedBackend::failing(ClassifierError::AuthRejected { status: 401 }));
        let classifier = Classifier::new(backend, ClassifierConfig::default());
        let result = classifier.classify(&memory()).await;
        assert_eq!(result.failure, Some(ClassifierError::AuthRejected { status: 401 }));
        assert!(!result.analysis.model_derived);
    }

    #[tokio::test]
    async fn unconfigured_backend_is_never_called() {
        let classifier = Classifier::new(Arc::new(ScriptedBackend::unconfigured()), ClassifierConfig::default());
        let result = classifier.classify(&memory()).await;
        assert_eq!(result.failure, Some(ClassifierError::MissingCredential));
    }

    #[tokio::test]
    async fn unparseable_reply_degrades() {
        let backend = Arc::new(ScriptedBackend::always("Sorry, I can't do that."));
        let classifier = Classifier::new(backend, ClassifierConfig::default());
        let result = classifier.classify(&memory()).await;
        assert!(matches!(result.failure, Some(ClassifierError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let backend = Arc::new(
            ScriptedBackend::always(model_response("keep", 0.9, 0.9, 0.5))
                .with_delay(std::time::Duration::from_secs(3)),
        );
        let config = ClassifierConfig {
            request_timeout_secs: 1,
            ..Default::default()
        };
        let result = Classifier::new(backend, config).classify(&memory()).await;
        assert_eq!(result.failure, Some(ClassifierError::Timeout));
    }
}
