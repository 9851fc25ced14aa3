//! Chat messages — the append-only per-session transcript.
//!
//! A session is nothing more than the shared `session_id` value across a run
//! of rows; there is no session table and no expiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Assistant,
}

/// One persisted chat turn. Never updated or deleted; replay is ordered
/// oldest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
  pub id:         i64,
  pub session_id: String,
  pub role:       Role,
  pub text:       String,
  /// Server-assigned timestamp; never changes after creation.
  pub sent_at:    DateTime<Utc>,
}
