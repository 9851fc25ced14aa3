//! `POST /api/chat` — one conversation turn.

use axum::{Form, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use hearth_core::store::LeadStore;

use crate::{AppState, completion::CompletionClient, convo, error::Error};

#[derive(Debug, Deserialize)]
pub struct ChatForm {
  pub message:    String,
  pub session_id: String,
}

/// Form fields `message`, `session_id` → `{response, session_id}`.
pub async fn chat_api<S, C>(
  State(state): State<AppState<S, C>>,
  Form(form): Form<ChatForm>,
) -> Result<Json<Value>, Error>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  C: CompletionClient + Clone + Send + Sync + 'static,
{
  let reply = convo::respond(
    state.store.as_ref(),
    state.completion.as_ref(),
    &form.session_id,
    &form.message,
  )
  .await
  .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(Json(json!({
    "response":   reply,
    "session_id": form.session_id,
  })))
}
