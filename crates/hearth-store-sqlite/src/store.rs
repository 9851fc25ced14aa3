//! [`SqliteStore`] — the SQLite implementation of [`LeadStore`].

use std::path::Path;

use chrono::Utc;
use hearth_core::{
  audit::AuditEntry,
  lead::{Lead, NewLead},
  message::{ChatMessage, Role},
  store::LeadStore,
};

use crate::{
  Error, Result,
  encode::{
    RawAudit, RawLead, RawMessage, encode_dt, encode_interest, encode_role,
    encode_source,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Hearth lead store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// operations are serialised onto the connection's worker thread, which is
/// what keeps each of them individually atomic.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Every audit entry, oldest first. The HTTP layer never reads these;
  /// they exist for operators (and tests) going straight to the store.
  pub async fn list_audit(&self) -> Result<Vec<AuditEntry>> {
    let raws: Vec<RawAudit> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, admin_user, action, details, recorded_at
           FROM admin_logs ORDER BY id ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawAudit {
              id:          row.get(0)?,
              admin_user:  row.get(1)?,
              action:      row.get(2)?,
              details:     row.get(3)?,
              recorded_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAudit::into_entry).collect()
  }
}

// ─── LeadStore impl ──────────────────────────────────────────────────────────

impl LeadStore for SqliteStore {
  type Error = Error;

  // ── Leads ─────────────────────────────────────────────────────────────────

  async fn upsert_lead(&self, input: NewLead) -> Result<Lead> {
    let created_at = Utc::now();

    let session_id   = input.session_id.clone();
    let name         = input.name.clone();
    let email        = input.email.clone();
    let phone        = input.phone.clone();
    let location     = input.location.clone();
    let home_value   = input.home_value.clone();
    let summary      = input.conversation_summary.clone();
    let at_str       = encode_dt(created_at);
    let interest_str = encode_interest(input.interest).to_owned();
    let source_str   = encode_source(input.source).to_owned();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO leads (
             session_id, created_at, name, email, phone, location,
             home_value, interest_level, source, conversation_summary
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            session_id,
            at_str,
            name,
            email,
            phone,
            location,
            home_value,
            interest_str,
            source_str,
            summary,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Lead {
      id,
      session_id:           input.session_id,
      created_at,
      name:                 input.name,
      email:                input.email,
      phone:                input.phone,
      location:             input.location,
      home_value:           input.home_value,
      interest:             input.interest,
      source:               input.source,
      conversation_summary: input.conversation_summary,
      affiliate_clicked:    false,
      quote_requested:      false,
    })
  }

  async fn list_leads(&self) -> Result<Vec<Lead>> {
    let raws: Vec<RawLead> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, session_id, created_at, name, email, phone, location,
                  home_value, interest_level, source, conversation_summary,
                  affiliate_clicked, quote_requested
           FROM leads
           ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawLead {
              id:                   row.get(0)?,
              session_id:           row.get(1)?,
              created_at:           row.get(2)?,
              name:                 row.get(3)?,
              email:                row.get(4)?,
              phone:                row.get(5)?,
              location:             row.get(6)?,
              home_value:           row.get(7)?,
              interest_level:       row.get(8)?,
              source:               row.get(9)?,
              conversation_summary: row.get(10)?,
              affiliate_clicked:    row.get(11)?,
              quote_requested:      row.get(12)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLead::into_lead).collect()
  }

  async fn count_leads(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM leads", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count as u64)
  }

  async fn delete_lead(&self, id: i64) -> Result<()> {
    // Deleting an id that does not exist is not an error.
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM leads WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Chat history ──────────────────────────────────────────────────────────

  async fn append_message(
    &self,
    session_id: &str,
    role: Role,
    text: &str,
  ) -> Result<ChatMessage> {
    let sent_at = Utc::now();

    let session_id_owned = session_id.to_owned();
    let text_owned       = text.to_owned();
    let role_str         = encode_role(role).to_owned();
    let at_str           = encode_dt(sent_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO chat_history (session_id, role, message, sent_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![session_id_owned, role_str, text_owned, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ChatMessage {
      id,
      session_id: session_id.to_owned(),
      role,
      text: text.to_owned(),
      sent_at,
    })
  }

  async fn recent_messages(
    &self,
    session_id: &str,
    limit: usize,
  ) -> Result<Vec<ChatMessage>> {
    let session_id_owned = session_id.to_owned();
    let limit_val = limit as i64;

    let raws: Vec<RawMessage> = self
      .conn
      .call(move |conn| {
        // Newest-first with the insertion id as tiebreaker, so equal
        // timestamps within a burst cannot reorder the window.
        let mut stmt = conn.prepare(
          "SELECT id, session_id, role, message, sent_at
           FROM chat_history
           WHERE session_id = ?1
           ORDER BY sent_at DESC, id DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![session_id_owned, limit_val], |row| {
            Ok(RawMessage {
              id:         row.get(0)?,
              session_id: row.get(1)?,
              role:       row.get(2)?,
              message:    row.get(3)?,
              sent_at:    row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut messages: Vec<ChatMessage> = raws
      .into_iter()
      .map(RawMessage::into_message)
      .collect::<Result<_>>()?;
    messages.reverse();
    Ok(messages)
  }

  // ── Audit log ─────────────────────────────────────────────────────────────

  async fn append_audit(
    &self,
    admin_user: &str,
    action: &str,
    detail: &str,
  ) -> Result<AuditEntry> {
    let recorded_at = Utc::now();

    let admin_user_owned = admin_user.to_owned();
    let action_owned     = action.to_owned();
    let detail_owned     = detail.to_owned();
    let at_str           = encode_dt(recorded_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO admin_logs (admin_user, action, details, recorded_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![admin_user_owned, action_owned, detail_owned, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(AuditEntry {
      id,
      admin_user:  admin_user.to_owned(),
      action:      action.to_owned(),
      detail:      detail.to_owned(),
      recorded_at,
    })
  }
}
