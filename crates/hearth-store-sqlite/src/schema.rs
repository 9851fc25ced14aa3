//! SQL schema for the Hearth SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per captured prospect. Email is the natural key: INSERT OR
-- REPLACE against the UNIQUE constraint swaps the whole record.
CREATE TABLE IF NOT EXISTS leads (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id           TEXT NOT NULL,
    created_at           TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    name                 TEXT NOT NULL,
    email                TEXT NOT NULL UNIQUE,
    phone                TEXT NOT NULL DEFAULT '',
    location             TEXT NOT NULL DEFAULT '',
    home_value           TEXT NOT NULL DEFAULT '',
    interest_level       TEXT NOT NULL DEFAULT 'low',   -- 'low' | 'high'
    source               TEXT NOT NULL DEFAULT 'web',   -- 'web' | 'facebook'
    conversation_summary TEXT NOT NULL DEFAULT '',
    affiliate_clicked    INTEGER NOT NULL DEFAULT 0,
    quote_requested      INTEGER NOT NULL DEFAULT 0
);

-- Chat turns are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS chat_history (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    role       TEXT NOT NULL,      -- 'user' | 'assistant'
    message    TEXT NOT NULL,
    sent_at    TEXT NOT NULL       -- RFC 3339 UTC; server-assigned
);

-- Append-only audit trail of mutating admin operations.
CREATE TABLE IF NOT EXISTS admin_logs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    admin_user  TEXT NOT NULL,
    action      TEXT NOT NULL,
    details     TEXT NOT NULL DEFAULT '',
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS chat_history_session_idx ON chat_history(session_id);
CREATE INDEX IF NOT EXISTS leads_created_idx        ON leads(created_at);

PRAGMA user_version = 1;
";
