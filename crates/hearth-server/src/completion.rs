//! The chat-completion provider client.
//!
//! The provider is modelled as an injected capability so handlers and tests
//! can substitute a deterministic stub for the live API.

use std::future::Future;

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Default model requested from the provider.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

const COMPLETIONS_URL: &str =
  "https://api.groq.com/openai/v1/chat/completions";

/// Bounded output length per reply.
const MAX_TOKENS: u32 = 500;
/// Low randomness keeps replies on-script.
const TEMPERATURE: f64 = 0.3;

// ─── Prompt types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
  System,
  User,
  Assistant,
}

/// One message in the provider's wire schema.
#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
  pub role:    PromptRole,
  pub content: String,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CompletionError {
  #[error("completion API key not configured")]
  MissingKey,

  #[error("completion request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("completion API returned {status}: {body}")]
  Api { status: u16, body: String },

  #[error("completion response had empty content")]
  EmptyContent,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Capability interface over "complete(messages) → text".
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait CompletionClient: Send + Sync {
  /// Produce the assistant reply for `messages`.
  fn complete<'a>(
    &'a self,
    messages: &'a [PromptMessage],
  ) -> impl Future<Output = Result<String, CompletionError>> + Send + 'a;
}

// ─── Hosted client ───────────────────────────────────────────────────────────

/// Client for the hosted completion API (OpenAI-compatible wire format).
#[derive(Clone)]
pub struct GroqClient {
  http:    reqwest::Client,
  api_key: Option<String>,
  model:   String,
}

impl GroqClient {
  pub fn new(
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
  ) -> Self {
    Self { http, api_key, model }
  }
}

impl CompletionClient for GroqClient {
  async fn complete(
    &self,
    messages: &[PromptMessage],
  ) -> Result<String, CompletionError> {
    let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingKey)?;

    let response = self
      .http
      .post(COMPLETIONS_URL)
      .bearer_auth(api_key)
      .json(&json!({
        "model": self.model,
        "messages": messages,
        "temperature": TEMPERATURE,
        "max_tokens": MAX_TOKENS,
      }))
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      return Err(CompletionError::Api { status, body });
    }

    let payload = response.json::<Value>().await?;
    let text = payload
      .get("choices")
      .and_then(Value::as_array)
      .and_then(|choices| choices.first())
      .and_then(|choice| choice.get("message"))
      .and_then(|msg| msg.get("content"))
      .and_then(Value::as_str)
      .map(str::trim)
      .unwrap_or("")
      .to_string();

    if text.is_empty() {
      return Err(CompletionError::EmptyContent);
    }
    Ok(text)
  }
}
