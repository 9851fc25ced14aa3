//! `POST /api/lead` — capture a lead from the quote form.

use axum::{Form, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use hearth_core::{
  affiliate,
  lead::{InterestLevel, LeadSource, NewLead},
  store::LeadStore,
};

use crate::{AppState, completion::CompletionClient, error::Error};

/// Summary marker recorded for leads that arrive via the form rather than
/// being inferred from chat.
const FORM_SUMMARY: &str = "Form submission";

#[derive(Debug, Deserialize)]
pub struct LeadForm {
  pub name:       String,
  pub email:      String,
  #[serde(default)]
  pub phone:      String,
  #[serde(default)]
  pub location:   String,
  #[serde(default)]
  pub home_value: String,
  pub session_id: String,
}

/// Upserts the lead at high interest and returns the partner signup link.
/// Never calls the completion provider.
pub async fn save_lead<S, C>(
  State(state): State<AppState<S, C>>,
  Form(form): Form<LeadForm>,
) -> Result<Json<Value>, Error>
where
  S: LeadStore + Clone + Send + Sync + 'static,
  C: CompletionClient + Clone + Send + Sync + 'static,
{
  let affiliate_link = affiliate::signup_link(&form.email);

  let lead = NewLead {
    session_id:           form.session_id,
    name:                 form.name,
    email:                form.email,
    phone:                form.phone,
    location:             form.location,
    home_value:           form.home_value,
    interest:             InterestLevel::High,
    source:               LeadSource::Web,
    conversation_summary: FORM_SUMMARY.to_string(),
  };

  let saved = state
    .store
    .upsert_lead(lead)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  tracing::info!("lead saved: {}", saved.email);

  Ok(Json(json!({
    "success":        true,
    "message":        "Thank you! We'll contact you shortly.",
    "affiliate_link": affiliate_link,
  })))
}
