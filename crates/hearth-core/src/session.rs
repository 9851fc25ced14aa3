//! Session identity.
//!
//! A session is an opaque string correlating a run of chat turns; it is not
//! authenticated and never expires. Web sessions are random; messenger
//! sessions are derived from the sender id with an origin prefix so the two
//! namespaces cannot collide.

use uuid::Uuid;

/// Prefix applied to messenger sender ids to form a session id.
const MESSENGER_PREFIX: &str = "fb_";

/// A fresh, collision-resistant session id for a web visitor.
pub fn web_session_id() -> String {
  Uuid::new_v4().to_string()
}

/// The session id for a messenger sender.
pub fn messenger_session_id(sender_id: &str) -> String {
  format!("{MESSENGER_PREFIX}{sender_id}")
}
