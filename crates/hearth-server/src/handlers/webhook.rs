//! Messenger webhook verification and inbound delivery.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use hearth_core::{session, store::LeadStore};

use crate::{
  AppState,
  completion::CompletionClient,
  convo,
  error::Error,
  messenger::{self, InboundPayload},
};

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
  #[serde(default)]
  pub hub_mode:         String,
  #[serde(default)]
  pub hub_challenge:    String,
  #[serde(default)]
  pub hub_verify_token: String,
}

/// `GET /webhook` — subscription handshake.
///
/// Echoes the numeric challenge only for the subscribe mode with the
/// configured token; everything else (wrong mode, wrong token, non-numeric
/// challenge) is a 403.
pub async fn verify<S, C>(
  State(state): State<AppState<S, C>>,
  Query(params): Query<VerifyParams>,
) -> Result<String, Error>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  C: CompletionClient + Clone + Send + Sync + 'static,
{
  if params.hub_mode == messenger::SUBSCRIBE_MODE
    && params.hub_verify_token == state.config.fb_verify_token
    && let Ok(challenge) = params.hub_challenge.parse::<i64>()
  {
    return Ok(challenge.to_string());
  }

  Err(Error::Forbidden("verification failed"))
}

/// `POST /webhook` — inbound delivery.
///
/// Always acknowledges with HTTP 200 so the platform does not redeliver;
/// the status field distinguishes parse/processing failures from success.
pub async fn inbound<S, C>(
  State(state): State<AppState<S, C>>,
  body: String,
) -> Json<Value>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  C: CompletionClient + Clone + Send + Sync + 'static,
{
  let payload: InboundPayload = match serde_json::from_str(&body) {
    Ok(payload) => payload,
    Err(err) => {
      tracing::warn!("webhook payload did not parse: {err}");
      return Json(json!({ "status": "error" }));
    }
  };

  for entry in &payload.entry {
    for event in &entry.messaging {
      let Some((sender_id, text)) = event.sender_and_text() else {
        continue;
      };

      let session_id = session::messenger_session_id(sender_id);
      let reply = match convo::respond(
        state.store.as_ref(),
        state.completion.as_ref(),
        &session_id,
        text,
      )
      .await
      {
        Ok(reply) => reply,
        Err(err) => {
          tracing::error!("webhook conversation failed: {err}");
          return Json(json!({ "status": "error" }));
        }
      };

      match state.config.fb_page_access_token.as_deref() {
        Some(token) => {
          // Single attempt; a lost reply is acceptable, a redelivery loop
          // is not.
          if let Err(err) =
            messenger::send_message(&state.http, token, sender_id, &reply)
              .await
          {
            tracing::warn!("messenger send failed: {err}");
          }
        }
        None => {
          tracing::debug!("messenger send skipped: no page access token");
        }
      }
    }
  }

  Json(json!({ "status": "ok" }))
}
