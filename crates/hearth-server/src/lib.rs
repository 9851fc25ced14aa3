//! HTTP layer for Hearth — an insurance lead-generation chatbot.
//!
//! Exposes an axum [`Router`] over any [`LeadStore`] backend and any
//! [`CompletionClient`], wired together by the `server` binary.

pub mod auth;
pub mod completion;
pub mod convo;
pub mod error;
pub mod handlers;
pub mod messenger;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use hearth_core::store::LeadStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use completion::CompletionClient;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, layered from `config.toml` and `HEARTH_*`
/// environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "defaults::host")]
  pub host:                 String,
  #[serde(default = "defaults::port")]
  pub port:                 u16,
  #[serde(default = "defaults::store_path")]
  pub store_path:           PathBuf,
  /// Completion-provider API key. Absent means every chat reply degrades to
  /// the canned fallback.
  #[serde(default)]
  pub groq_api_key:         Option<String>,
  #[serde(default = "defaults::completion_model")]
  pub completion_model:     String,
  /// Messenger page access token. Absent disables outbound sends only;
  /// webhook verification still runs.
  #[serde(default)]
  pub fb_page_access_token: Option<String>,
  #[serde(default = "defaults::fb_verify_token")]
  pub fb_verify_token:      String,
  #[serde(default = "defaults::admin_username")]
  pub admin_username:       String,
  /// argon2 PHC string; absent enables the development fallback password.
  #[serde(default)]
  pub admin_password_hash:  Option<String>,
}

mod defaults {
  use std::path::PathBuf;

  pub fn host() -> String { "0.0.0.0".to_string() }

  pub fn port() -> u16 { 8000 }

  pub fn store_path() -> PathBuf { PathBuf::from("hearth.db") }

  pub fn completion_model() -> String {
    crate::completion::DEFAULT_MODEL.to_string()
  }

  pub fn fb_verify_token() -> String { "insurance_bot_2025".to_string() }

  pub fn admin_username() -> String { "admin".to_string() }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S, C> {
  pub store:      Arc<S>,
  pub completion: Arc<C>,
  pub config:     Arc<ServerConfig>,
  pub auth:       Arc<AuthConfig>,
  /// Outbound HTTP client for the messenger send API.
  pub http:       reqwest::Client,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the service.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: LeadStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: CompletionClient + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/",                    get(handlers::pages::landing))
    .route("/chat",                get(handlers::pages::chat_page))
    .route("/health",              get(handlers::pages::health))
    .route("/api/chat",            post(handlers::chat::chat_api::<S, C>))
    .route("/api/lead",            post(handlers::lead::save_lead::<S, C>))
    .route(
      "/webhook",
      get(handlers::webhook::verify::<S, C>)
        .post(handlers::webhook::inbound::<S, C>),
    )
    .route("/admin",               get(handlers::admin::dashboard::<S, C>))
    .route("/api/admin/leads",     get(handlers::admin::list_leads::<S, C>))
    .route("/api/admin/lead/{id}", delete(handlers::admin::delete_lead::<S, C>))
    .route("/track/{partner}",     get(handlers::track::click))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::{Arc, Mutex};

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::body::Body;
  use axum::http::{Request, StatusCode, header};
  use hearth_core::{message::Role, store::LeadStore};
  use hearth_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::Value;
  use tower::ServiceExt as _;

  use crate::completion::{CompletionClient, CompletionError, PromptMessage};

  /// Scripted completion client. `reply: None` simulates a provider
  /// failure; `seen` records how many prompt messages each call carried.
  #[derive(Clone)]
  struct StubCompletion {
    reply: Option<&'static str>,
    seen:  Arc<Mutex<Vec<usize>>>,
  }

  impl StubCompletion {
    fn replying(reply: &'static str) -> Self {
      Self { reply: Some(reply), seen: Arc::new(Mutex::new(Vec::new())) }
    }

    fn failing() -> Self {
      Self { reply: None, seen: Arc::new(Mutex::new(Vec::new())) }
    }
  }

  impl CompletionClient for StubCompletion {
    async fn complete(
      &self,
      messages: &[PromptMessage],
    ) -> Result<String, CompletionError> {
      self.seen.lock().unwrap().push(messages.len());
      match self.reply {
        Some(reply) => Ok(reply.to_string()),
        None => Err(CompletionError::MissingKey),
      }
    }
  }

  async fn make_state(
    completion: StubCompletion,
  ) -> AppState<SqliteStore, StubCompletion> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(b"secret", &salt)
      .unwrap()
      .to_string();

    AppState {
      store:      Arc::new(store),
      completion: Arc::new(completion),
      config:     Arc::new(ServerConfig {
        host:                 "127.0.0.1".to_string(),
        port:                 8000,
        store_path:           PathBuf::from(":memory:"),
        groq_api_key:         None,
        completion_model:     completion::DEFAULT_MODEL.to_string(),
        fb_page_access_token: None,
        fb_verify_token:      "test_token".to_string(),
        admin_username:       "admin".to_string(),
        admin_password_hash:  Some(hash.clone()),
      }),
      auth:       Arc::new(AuthConfig {
        username:      "admin".to_string(),
        password_hash: Some(hash),
      }),
      http:       reqwest::Client::new(),
    }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as B64;
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore, StubCompletion>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  const FORM_TYPE: &str = "application/x-www-form-urlencoded";

  async fn post_chat(
    state: AppState<SqliteStore, StubCompletion>,
    session_id: &str,
    message: &str,
  ) -> axum::response::Response {
    let encoded = message.replace(' ', "+");
    oneshot_raw(
      state,
      "POST",
      "/api/chat",
      vec![(header::CONTENT_TYPE, FORM_TYPE)],
      &format!("message={encoded}&session_id={session_id}"),
    )
    .await
  }

  // ── Health and pages ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_reports_healthy() {
    let state = make_state(StubCompletion::replying("ok")).await;
    let resp  = oneshot_raw(state, "GET", "/health", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
  }

  #[tokio::test]
  async fn chat_page_embeds_a_session_id() {
    let state = make_state(StubCompletion::replying("ok")).await;
    let resp  = oneshot_raw(state, "GET", "/chat", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("data-session-id=\""), "page: {html}");
  }

  // ── Chat ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn chat_turn_returns_reply_and_persists_both_turns() {
    let state = make_state(StubCompletion::replying("Hi there!")).await;

    let resp = post_chat(state.clone(), "s1", "hello").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["response"], "Hi there!");
    assert_eq!(json["session_id"], "s1");

    let history = state.store.recent_messages("s1", 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].text, "hello");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].text, "Hi there!");
  }

  #[tokio::test]
  async fn pricing_intent_suffixes_response_but_not_history() {
    let state = make_state(StubCompletion::replying("Coverage varies.")).await;

    let resp = post_chat(state.clone(), "s1", "how much does it cost").await;
    let json = body_json(resp).await;
    let reply = json["response"].as_str().unwrap();
    assert!(reply.starts_with("Coverage varies."));
    assert!(reply.contains("**Need actual quotes?**"), "reply: {reply}");

    let history = state.store.recent_messages("s1", 10).await.unwrap();
    assert_eq!(history[1].text, "Coverage varies.");
  }

  #[tokio::test]
  async fn greeting_gets_no_pricing_suffix() {
    let state = make_state(StubCompletion::replying("Hello!")).await;

    let resp = post_chat(state, "s1", "hello").await;
    let json = body_json(resp).await;
    assert_eq!(json["response"], "Hello!");
  }

  #[tokio::test]
  async fn provider_failure_falls_back_and_still_persists() {
    let state = make_state(StubCompletion::failing()).await;

    let resp = post_chat(state.clone(), "s1", "hello").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["response"], convo::FALLBACK_REPLY);

    // The fallback is persisted as the assistant turn; still two writes.
    let history = state.store.recent_messages("s1", 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].text, convo::FALLBACK_REPLY);
  }

  #[tokio::test]
  async fn prompt_window_is_capped_at_six_turns_plus_system() {
    let stub  = StubCompletion::replying("ok");
    let state = make_state(stub.clone()).await;

    for i in 0..4 {
      post_chat(state.clone(), "s1", &format!("turn {i}")).await;
    }

    // History grows 1, 3, 5, 7 turns at call time; the window caps the
    // last call at 6, plus the system message on every call.
    assert_eq!(*stub.seen.lock().unwrap(), vec![2, 4, 6, 7]);
  }

  // ── Lead capture ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn lead_capture_returns_affiliate_link_and_saves() {
    let state = make_state(StubCompletion::replying("ok")).await;

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/api/lead",
      vec![(header::CONTENT_TYPE, FORM_TYPE)],
      "name=Alice&email=alice@example.com&phone=&location=&home_value=&session_id=s1",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    let link = json["affiliate_link"].as_str().unwrap();
    assert!(link.contains("email=alice@example.com"), "link: {link}");
    assert!(link.contains("agent=INSURANCEBOT"), "link: {link}");

    let leads = state.store.list_leads().await.unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].name, "Alice");
    assert_eq!(
      leads[0].interest,
      hearth_core::lead::InterestLevel::High
    );
    assert_eq!(leads[0].conversation_summary, "Form submission");
  }

  // ── Webhook ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn webhook_verify_echoes_numeric_challenge() {
    let state = make_state(StubCompletion::replying("ok")).await;
    let resp  = oneshot_raw(
      state,
      "GET",
      "/webhook?hub_mode=subscribe&hub_challenge=1158201444&hub_verify_token=test_token",
      vec![],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "1158201444");
  }

  #[tokio::test]
  async fn webhook_verify_rejects_wrong_token() {
    let state = make_state(StubCompletion::replying("ok")).await;
    let resp  = oneshot_raw(
      state,
      "GET",
      "/webhook?hub_mode=subscribe&hub_challenge=42&hub_verify_token=wrong",
      vec![],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn webhook_verify_rejects_wrong_mode() {
    let state = make_state(StubCompletion::replying("ok")).await;
    let resp  = oneshot_raw(
      state,
      "GET",
      "/webhook?hub_mode=unsubscribe&hub_challenge=42&hub_verify_token=test_token",
      vec![],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn webhook_verify_rejects_non_numeric_challenge() {
    let state = make_state(StubCompletion::replying("ok")).await;
    let resp  = oneshot_raw(
      state,
      "GET",
      "/webhook?hub_mode=subscribe&hub_challenge=abc&hub_verify_token=test_token",
      vec![],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn webhook_inbound_drives_the_conversation() {
    let state = make_state(StubCompletion::replying("Happy to help!")).await;

    let payload = r#"{
      "object": "page",
      "entry": [{
        "messaging": [{
          "sender": { "id": "9001" },
          "message": { "text": "do you cover floods?" }
        }]
      }]
    }"#;

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/webhook",
      vec![(header::CONTENT_TYPE, "application/json")],
      payload,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");

    // Messenger turns land under the origin-prefixed session id.
    let history = state.store.recent_messages("fb_9001", 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "do you cover floods?");
    assert_eq!(history[1].text, "Happy to help!");
  }

  #[tokio::test]
  async fn webhook_inbound_malformed_body_still_returns_200() {
    let state = make_state(StubCompletion::replying("ok")).await;
    let resp  = oneshot_raw(
      state,
      "POST",
      "/webhook",
      vec![(header::CONTENT_TYPE, "application/json")],
      "this is not json",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "error");
  }

  #[tokio::test]
  async fn webhook_inbound_ignores_events_without_text() {
    let state = make_state(StubCompletion::replying("ok")).await;
    let payload =
      r#"{ "entry": [{ "messaging": [{ "sender": { "id": "9001" } }] }] }"#;

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/webhook",
      vec![(header::CONTENT_TYPE, "application/json")],
      payload,
    )
    .await;
    assert_eq!(body_json(resp).await["status"], "ok");

    let history = state.store.recent_messages("fb_9001", 10).await.unwrap();
    assert!(history.is_empty());
  }

  // ── Admin ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_routes_reject_missing_and_bad_credentials() {
    let state = make_state(StubCompletion::replying("ok")).await;

    for (method, uri) in [
      ("GET", "/admin"),
      ("GET", "/api/admin/leads"),
      ("DELETE", "/api/admin/lead/1"),
    ] {
      let resp = oneshot_raw(state.clone(), method, uri, vec![], "").await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");

      let auth = auth_header("admin", "wrong");
      let resp = oneshot_raw(
        state.clone(),
        method,
        uri,
        vec![(header::AUTHORIZATION, auth.as_str())],
        "",
      )
      .await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
  }

  #[tokio::test]
  async fn admin_leads_lists_saved_leads() {
    let state = make_state(StubCompletion::replying("ok")).await;

    oneshot_raw(
      state.clone(),
      "POST",
      "/api/lead",
      vec![(header::CONTENT_TYPE, FORM_TYPE)],
      "name=Bob&email=bob@example.com&session_id=s2",
    )
    .await;

    let auth = auth_header("admin", "secret");
    let resp = oneshot_raw(
      state,
      "GET",
      "/api/admin/leads",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let leads = json["leads"].as_array().unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["email"], "bob@example.com");
  }

  #[tokio::test]
  async fn admin_dashboard_reports_counts() {
    let state = make_state(StubCompletion::replying("ok")).await;

    oneshot_raw(
      state.clone(),
      "POST",
      "/api/lead",
      vec![(header::CONTENT_TYPE, FORM_TYPE)],
      "name=Bob&email=bob@example.com&session_id=s2",
    )
    .await;

    let auth = auth_header("admin", "secret");
    let resp = oneshot_raw(
      state,
      "GET",
      "/admin",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("1 total, 1 today"), "dashboard: {html}");
    assert!(html.contains("bob@example.com"), "dashboard: {html}");
  }

  #[tokio::test]
  async fn deleting_a_missing_lead_succeeds_and_writes_one_audit_entry() {
    let state = make_state(StubCompletion::replying("ok")).await;

    let auth = auth_header("admin", "secret");
    let resp = oneshot_raw(
      state.clone(),
      "DELETE",
      "/api/admin/lead/424242",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["success"], true);

    let audit = state.store.list_audit().await.unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].admin_user, "admin");
    assert_eq!(audit[0].action, "delete_lead");
    assert!(audit[0].detail.contains("424242"));
  }

  // ── Affiliate tracking ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn track_redirects_with_tracking_params() {
    let state = make_state(StubCompletion::replying("ok")).await;
    let resp  = oneshot_raw(
      state,
      "GET",
      "/track/thezebra?email=x@y.com&source=web",
      vec![],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp
      .headers()
      .get(header::LOCATION)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(location.starts_with("https://www.thezebra.com/"), "{location}");
    assert!(location.contains("email=x@y.com"), "{location}");
    assert!(location.contains("source=web"), "{location}");
  }

  #[tokio::test]
  async fn track_unknown_partner_falls_back() {
    let state = make_state(StubCompletion::replying("ok")).await;
    let resp  = oneshot_raw(state, "GET", "/track/unknown", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp
      .headers()
      .get(header::LOCATION)
      .unwrap()
      .to_str()
      .unwrap();
    assert_eq!(location, hearth_core::affiliate::FALLBACK_URL);
  }
}
