//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Enums are stored as their
//! lowercase discriminants; booleans as SQLite integers.

use chrono::{DateTime, Utc};
use hearth_core::{
  audit::AuditEntry,
  lead::{InterestLevel, Lead, LeadSource},
  message::{ChatMessage, Role},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::User => "user",
    Role::Assistant => "assistant",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "user" => Ok(Role::User),
    "assistant" => Ok(Role::Assistant),
    other => Err(Error::UnknownRole(other.to_string())),
  }
}

// ─── InterestLevel ───────────────────────────────────────────────────────────

pub fn encode_interest(i: InterestLevel) -> &'static str {
  match i {
    InterestLevel::Low => "low",
    InterestLevel::High => "high",
  }
}

pub fn decode_interest(s: &str) -> Result<InterestLevel> {
  match s {
    "low" => Ok(InterestLevel::Low),
    "high" => Ok(InterestLevel::High),
    other => Err(Error::UnknownInterest(other.to_string())),
  }
}

// ─── LeadSource ──────────────────────────────────────────────────────────────

pub fn encode_source(s: LeadSource) -> &'static str {
  match s {
    LeadSource::Web => "web",
    LeadSource::Facebook => "facebook",
  }
}

pub fn decode_source(s: &str) -> Result<LeadSource> {
  match s {
    "web" => Ok(LeadSource::Web),
    "facebook" => Ok(LeadSource::Facebook),
    other => Err(Error::UnknownSource(other.to_string())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `leads` row.
pub struct RawLead {
  pub id:                   i64,
  pub session_id:           String,
  pub created_at:           String,
  pub name:                 String,
  pub email:                String,
  pub phone:                String,
  pub location:             String,
  pub home_value:           String,
  pub interest_level:       String,
  pub source:               String,
  pub conversation_summary: String,
  pub affiliate_clicked:    bool,
  pub quote_requested:      bool,
}

impl RawLead {
  pub fn into_lead(self) -> Result<Lead> {
    Ok(Lead {
      id:                   self.id,
      session_id:           self.session_id,
      created_at:           decode_dt(&self.created_at)?,
      name:                 self.name,
      email:                self.email,
      phone:                self.phone,
      location:             self.location,
      home_value:           self.home_value,
      interest:             decode_interest(&self.interest_level)?,
      source:               decode_source(&self.source)?,
      conversation_summary: self.conversation_summary,
      affiliate_clicked:    self.affiliate_clicked,
      quote_requested:      self.quote_requested,
    })
  }
}

/// Raw values read directly from a `chat_history` row.
pub struct RawMessage {
  pub id:         i64,
  pub session_id: String,
  pub role:       String,
  pub message:    String,
  pub sent_at:    String,
}

impl RawMessage {
  pub fn into_message(self) -> Result<ChatMessage> {
    Ok(ChatMessage {
      id:         self.id,
      session_id: self.session_id,
      role:       decode_role(&self.role)?,
      text:       self.message,
      sent_at:    decode_dt(&self.sent_at)?,
    })
  }
}

/// Raw values read directly from an `admin_logs` row.
pub struct RawAudit {
  pub id:          i64,
  pub admin_user:  String,
  pub action:      String,
  pub details:     String,
  pub recorded_at: String,
}

impl RawAudit {
  pub fn into_entry(self) -> Result<AuditEntry> {
    Ok(AuditEntry {
      id:          self.id,
      admin_user:  self.admin_user,
      action:      self.action,
      detail:      self.details,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
