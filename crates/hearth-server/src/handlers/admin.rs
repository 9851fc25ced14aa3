//! Admin surface: dashboard, lead listing, lead deletion.
//!
//! Every handler here takes [`Authenticated`] first, so requests without
//! valid Basic credentials are rejected before any store access.

use axum::{
  Json,
  extract::{Path, State},
  response::Html,
};
use chrono::Local;
use serde_json::{Value, json};

use hearth_core::{lead::Lead, store::LeadStore};

use crate::{
  AppState, auth::Authenticated, completion::CompletionClient, error::Error,
};

/// Leads created on the server's current local date.
fn today_count(leads: &[Lead]) -> usize {
  let today = Local::now().date_naive();
  leads
    .iter()
    .filter(|lead| lead.created_at.with_timezone(&Local).date_naive() == today)
    .count()
}

/// `GET /admin` — dashboard shell fed by the lead list and counts.
pub async fn dashboard<S, C>(
  Authenticated(username): Authenticated,
  State(state): State<AppState<S, C>>,
) -> Result<Html<String>, Error>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  C: CompletionClient + Clone + Send + Sync + 'static,
{
  let total = state
    .store
    .count_leads()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let leads = state
    .store
    .list_leads()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let today = today_count(&leads);

  let mut rows = String::new();
  for lead in &leads {
    rows.push_str(&format!(
      "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
      lead.id,
      lead.name,
      lead.email,
      lead.created_at.to_rfc3339(),
    ));
  }

  Ok(Html(format!(
    "<!doctype html><html><head><title>Leads</title></head><body>\
     <h1>Leads</h1>\
     <p>Signed in as {username}. {total} total, {today} today.</p>\
     <table>{rows}</table></body></html>"
  )))
}

/// `GET /api/admin/leads`
pub async fn list_leads<S, C>(
  Authenticated(_username): Authenticated,
  State(state): State<AppState<S, C>>,
) -> Result<Json<Value>, Error>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  C: CompletionClient + Clone + Send + Sync + 'static,
{
  let leads = state
    .store
    .list_leads()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(Json(json!({ "leads": leads })))
}

/// `DELETE /api/admin/lead/{id}`
///
/// Succeeds — and still writes exactly one audit entry — even when the id
/// does not exist.
pub async fn delete_lead<S, C>(
  Authenticated(username): Authenticated,
  State(state): State<AppState<S, C>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, Error>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  C: CompletionClient + Clone + Send + Sync + 'static,
{
  state
    .store
    .delete_lead(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  state
    .store
    .append_audit(&username, "delete_lead", &format!("Deleted lead ID: {id}"))
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(Json(json!({ "success": true })))
}
