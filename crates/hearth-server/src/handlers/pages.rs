//! Landing, chat, and health endpoints.
//!
//! The page handlers return bare HTML shells; the real presentation layer
//! ships separately and is not this service's concern.

use axum::{Json, response::Html};
use chrono::Utc;
use serde_json::{Value, json};

use hearth_core::session;

/// `GET /`
pub async fn landing() -> Html<&'static str> {
  Html(
    "<!doctype html><html><head><title>Hearth Insurance</title></head>\
     <body><h1>Hearth Insurance</h1>\
     <p><a href=\"/chat\">Chat with our assistant</a></p></body></html>",
  )
}

/// `GET /chat` — issues a fresh session id and embeds it in the page.
pub async fn chat_page() -> Html<String> {
  let session_id = session::web_session_id();
  Html(format!(
    "<!doctype html><html><head><title>Insurance Assistant</title></head>\
     <body data-session-id=\"{session_id}\">\
     <h1>Insurance Assistant</h1></body></html>"
  ))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
  Json(json!({
    "status": "healthy",
    "timestamp": Utc::now().to_rfc3339(),
  }))
}
