//! The `LeadStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `hearth-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  audit::AuditEntry,
  lead::{Lead, NewLead},
  message::{ChatMessage, Role},
};

/// Abstraction over the lead / chat-history / audit store backend.
///
/// The three record sets are independent: each operation is individually
/// atomic and no transaction ever spans more than one of them.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait LeadStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Leads ─────────────────────────────────────────────────────────────

  /// Insert a lead, replacing any existing record with the same email.
  ///
  /// Replacement is wholesale: every field of the prior record is
  /// overwritten, the id may be reassigned, and `created_at` resets to the
  /// time of the upsert. There is no field-level merge.
  fn upsert_lead(
    &self,
    input: NewLead,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  /// List every lead, newest first.
  fn list_leads(
    &self,
  ) -> impl Future<Output = Result<Vec<Lead>, Self::Error>> + Send + '_;

  /// Total number of stored leads.
  fn count_leads(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Delete a lead by id. Succeeds whether or not the id exists.
  fn delete_lead(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Chat history ──────────────────────────────────────────────────────

  /// Append one turn to a session's transcript.
  /// The `sent_at` timestamp is set by the store.
  fn append_message<'a>(
    &'a self,
    session_id: &'a str,
    role: Role,
    text: &'a str,
  ) -> impl Future<Output = Result<ChatMessage, Self::Error>> + Send + 'a;

  /// The most recent `limit` turns for a session, oldest first.
  fn recent_messages<'a>(
    &'a self,
    session_id: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ChatMessage>, Self::Error>> + Send + 'a;

  // ── Audit log ─────────────────────────────────────────────────────────

  /// Append one audit entry.
  /// The `recorded_at` timestamp is set by the store.
  fn append_audit<'a>(
    &'a self,
    admin_user: &'a str,
    action: &'a str,
    detail: &'a str,
  ) -> impl Future<Output = Result<AuditEntry, Self::Error>> + Send + 'a;
}
