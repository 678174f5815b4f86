//! OpenAI-compatible chat completions client (NVIDIA NIM and friends).
//!
//! One request per call, bounded by the configured timeout. Errors are
//! mapped onto [`ClassifierError`] and never retried here.

use async_trait::async_trait;
use garden_core::config::ClassifierConfig;
use garden_core::errors::ClassifierError;
use garden_core::models::CompletionRequest;
use garden_core::traits::ICompletionBackend;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Error body excerpt kept in `HttpStatus`.
const ERROR_BODY_CHARS: usize = 200;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    seed: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct NimBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl NimBackend {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("memory-garden/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClassifierError::Transport {
                reason: format!("client setup: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn transport_err(e: reqwest::Error) -> ClassifierError {
    if e.is_timeout() {
        ClassifierError::Timeout
    } else {
        ClassifierError::Transport {
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl ICompletionBackend for NimBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ClassifierError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClassifierError::MissingCredential)?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
            seed: request.seed,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_err)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let excerpt: String = text.chars().take(ERROR_BODY_CHARS).collect();
            return Err(ClassifierError::from_status(status.as_u16(), &self.model, excerpt));
        }

        let text = response.text().await.map_err(transport_err)?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| ClassifierError::MalformedResponse {
                reason: format!("response body: {e}"),
            })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ClassifierError::MalformedResponse {
                reason: "no completion content".to_string(),
            })?;
        debug!(chars = content.len(), "completion received");
        Ok(content)
    }

    fn name(&self) -> &str {
        "nim"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
