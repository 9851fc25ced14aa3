//! Lead types — a captured prospect's contact and interest data.
//!
//! A lead is keyed by email at the store: re-saving an existing email
//! replaces the prior record wholesale rather than merging fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How strongly the prospect has signalled buying interest.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InterestLevel {
  #[default]
  Low,
  High,
}

/// Which surface the lead arrived through.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LeadSource {
  #[default]
  Web,
  Facebook,
}

/// A persisted lead. `id` and `created_at` are assigned by the store; both
/// change when the record is replaced through an upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
  pub id:                   i64,
  pub session_id:           String,
  pub created_at:           DateTime<Utc>,
  pub name:                 String,
  pub email:                String,
  pub phone:                String,
  pub location:             String,
  pub home_value:           String,
  pub interest:             InterestLevel,
  pub source:               LeadSource,
  pub conversation_summary: String,
  pub affiliate_clicked:    bool,
  pub quote_requested:      bool,
}

/// Input to [`crate::store::LeadStore::upsert_lead`].
/// `id`, `created_at`, and the click/quote flags are always assigned by the
/// store.
#[derive(Debug, Clone)]
pub struct NewLead {
  pub session_id:           String,
  pub name:                 String,
  pub email:                String,
  pub phone:                String,
  pub location:             String,
  pub home_value:           String,
  pub interest:             InterestLevel,
  pub source:               LeadSource,
  pub conversation_summary: String,
}

impl NewLead {
  /// Convenience constructor with the optional contact fields left empty.
  pub fn new(
    session_id: impl Into<String>,
    name: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      session_id:           session_id.into(),
      name:                 name.into(),
      email:                email.into(),
      phone:                String::new(),
      location:             String::new(),
      home_value:           String::new(),
      interest:             InterestLevel::default(),
      source:               LeadSource::default(),
      conversation_summary: String::new(),
    }
  }
}
