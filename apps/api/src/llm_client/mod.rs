//! Groq chat-completion client. The single point of entry for all model
//! calls in the service; no other module talks to the provider directly.
//!
//! One request per analysis: a single POST, no retry loop. Anything the
//! caller should react to is reported through [`AnalysisError`], raw
//! completion text comes back untouched for the normalizer to deal with.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::errors::AnalysisError;

/// Default chat-completions endpoint.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// The model used for every analysis call.
/// Intentionally hardcoded so scores stay comparable across requests.
pub const MODEL: &str = "llama-3.3-70b-versatile";

/// Low temperature keeps the scoring output stable for identical input.
const TEMPERATURE: f64 = 0.2;

/// Completion backend trait. Implement this to swap the provider without
/// touching the pipeline or handler code.
///
/// Carried in `AppState` as `Arc<dyn CompletionBackend>`.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Sends one prompt and returns the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// The Groq client used by the analysis pipeline.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, AnalysisError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the provider's error message
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AnalysisError::ProviderRejected(format!(
                "status {}: {}",
                status.as_u16(),
                message
            )));
        }

        let body = response.text().await?;
        let envelope: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            AnalysisError::ProviderRejected(format!("unrecognizable response envelope: {}", e))
        })?;

        if let Some(usage) = &envelope.usage {
            debug!(
                "analysis call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        extract_completion(envelope)
    }
}

/// Pulls the first choice's message text out of a completion envelope.
fn extract_completion(envelope: ChatResponse) -> Result<String, AnalysisError> {
    let choice = envelope.choices.into_iter().next().ok_or_else(|| {
        AnalysisError::ProviderRejected("response contained no choices".to_string())
    })?;

    choice.message.content.ok_or_else(|| {
        AnalysisError::ProviderRejected("first choice contained no message content".to_string())
    })
}
