//! Admin audit entries — one appended per mutating admin operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An append-only record of a mutating admin action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
  pub id:          i64,
  pub admin_user:  String,
  pub action:      String,
  pub detail:      String,
  pub recorded_at: DateTime<Utc>,
}
