use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use garden_core::errors::ClassifierError;
use garden_core::models::CompletionRequest;
use garden_core::traits::ICompletionBackend;

type Reply = Result<String, ClassifierError>;

/// In-process stand-in for the completion service.
///
/// Replies come from a queue first, then from the fallback reply. Prompts
/// containing a registered needle fail with the paired error. Every call is
/// counted and its request kept.
pub struct ScriptedBackend {
    queue: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    failures: Vec<(String, ClassifierError)>,
    configured: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    /// Always answer with `reply`.
    pub fn always(reply: impl Into<String>) -> Self {
        Self::with_fallback(Ok(reply.into()))
    }

    /// Always fail with `error`.
    pub fn failing(error: ClassifierError) -> Self {
        Self::with_fallback(Err(error))
    }

    /// Answer from `replies` in order, then fail with `MalformedResponse`.
    pub fn sequence(replies: Vec<Reply>) -> Self {
        let backend = Self::with_fallback(Err(ClassifierError::MalformedResponse {
            reason: "script exhausted".into(),
        }));
        *backend.queue.lock().unwrap() = replies.into();
        backend
    }

    /// Reports no credential; calling it is a test failure.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::failing(ClassifierError::MissingCredential)
        }
    }

    fn with_fallback(fallback: Reply) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            failures: Vec::new(),
            configured: true,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail any prompt containing `needle`.
    pub fn fail_when_prompt_contains(mut self, needle: &str, error: ClassifierError) -> Self {
        self.failures.push((needle.to_string(), error));
        self
    }

    /// Sleep before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ICompletionBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ClassifierError> {
        assert!(self.configured, "unconfigured backend must not be called");
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((_, error)) = self
            .failures
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
        {
            return Err(error.clone());
        }
        let queued = self.queue.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| self.fallback.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
