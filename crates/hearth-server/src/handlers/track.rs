//! `GET /track/{partner}` — affiliate click redirect.

use axum::{
  extract::{Path, Query},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde::Deserialize;

use hearth_core::affiliate;

#[derive(Debug, Deserialize)]
pub struct TrackParams {
  pub email:  Option<String>,
  pub source: Option<String>,
}

/// 302 to the partner's base URL with tracking parameters appended.
/// Unknown partner slugs fall back to the default base URL.
pub async fn click(
  Path(partner): Path<String>,
  Query(params): Query<TrackParams>,
) -> Response {
  tracing::info!(
    "affiliate click: {partner}, email: {:?}, source: {:?}",
    params.email,
    params.source
  );

  let url = affiliate::tracking_url(
    &partner,
    params.email.as_deref(),
    params.source.as_deref(),
  );

  (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
}
