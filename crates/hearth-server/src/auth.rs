//! HTTP Basic-auth extractor and standalone verifier.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::{AppState, completion::CompletionClient, error::Error};
use hearth_core::store::LeadStore;

/// Password accepted when no hash is configured. Development only.
const DEV_FALLBACK_PASSWORD: &str = "admin123";

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`. When absent,
  /// the development fallback password is accepted instead.
  pub password_hash: Option<String>,
}

/// Present in the handler means the request was authenticated.
/// Carries the admin username for audit entries.
pub struct Authenticated(pub String);

/// Verify credentials directly from headers.
///
/// Every failure mode — missing or malformed header, unknown username,
/// wrong password — collapses to the same [`Error::Unauthorized`], so the
/// response never reveals which part was wrong.
pub fn verify_auth(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<String, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  if username != config.username {
    return Err(Error::Unauthorized);
  }

  match &config.password_hash {
    Some(hash) => {
      let parsed_hash =
        PasswordHash::new(hash).map_err(|_| Error::Unauthorized)?;

      Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| Error::Unauthorized)?;
    }
    None => {
      if password != DEV_FALLBACK_PASSWORD {
        return Err(Error::Unauthorized);
      }
    }
  }

  Ok(username.to_string())
}

impl<S, C> FromRequestParts<AppState<S, C>> for Authenticated
where
  S: LeadStore + Clone + Send + Sync + 'static,
  C: CompletionClient + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, C>,
  ) -> Result<Self, Self::Rejection> {
    let username = verify_auth(&parts.headers, &state.auth)?;
    Ok(Authenticated(username))
  }
}
