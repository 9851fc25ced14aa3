//! Messenger webhook payload types and the outbound send call.

use serde::Deserialize;
use serde_json::json;

/// Mode literal expected during webhook verification.
pub const SUBSCRIBE_MODE: &str = "subscribe";

const SEND_API_URL: &str = "https://graph.facebook.com/v18.0/me/messages";

// ─── Inbound payload ─────────────────────────────────────────────────────────

/// Top-level webhook delivery. Every level tolerates absent fields, so
/// unrelated event types deserialise to empty entries instead of failing.
#[derive(Debug, Deserialize)]
pub struct InboundPayload {
  #[serde(default)]
  pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
  #[serde(default)]
  pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Deserialize)]
pub struct MessagingEvent {
  pub sender:  Option<Sender>,
  pub message: Option<MessageBody>,
}

#[derive(Debug, Deserialize)]
pub struct Sender {
  pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
  pub text: Option<String>,
}

impl MessagingEvent {
  /// Sender id and message text, when both are present.
  pub fn sender_and_text(&self) -> Option<(&str, &str)> {
    let sender_id = self.sender.as_ref()?.id.as_deref()?;
    let text = self.message.as_ref()?.text.as_deref()?;
    Some((sender_id, text))
  }
}

// ─── Outbound send ───────────────────────────────────────────────────────────

/// Deliver `text` to `recipient_id` via the platform's send API.
///
/// One attempt, no retry. Returns an error description on any failure; the
/// caller logs and drops it.
pub async fn send_message(
  http:         &reqwest::Client,
  access_token: &str,
  recipient_id: &str,
  text:         &str,
) -> Result<(), String> {
  let response = http
    .post(SEND_API_URL)
    .query(&[("access_token", access_token)])
    .json(&json!({
      "recipient": { "id": recipient_id },
      "message":   { "text": text },
    }))
    .send()
    .await
    .map_err(|e| format!("send request failed: {e}"))?;

  if !response.status().is_success() {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    return Err(format!("send API returned {status}: {body}"));
  }

  Ok(())
}
