//! `GET /navigate/{target}`: the navigation dispatcher.
//!
//! The guard runs on every attempt. A forward replaces the in-flight target
//! and the guard runs again on the replacement; the title pipeline only runs
//! on the target that is finally entered.

use axum::{
  Json,
  extract::{Path, State},
  http::HeaderMap,
};
use serde::Serialize;
use waypost_core::{
  session::SessionId,
  target::{NavigationTarget, TargetId},
};

use crate::{AppState, error::Error, language::requested_locale};

/// Header carrying the caller's session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Upper bound on forwards within one attempt.
pub const MAX_FORWARDS: usize = 8;

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
  /// The target that was entered.
  pub target:         TargetId,
  /// The originally requested target, if the guard forwarded.
  pub forwarded_from: Option<TargetId>,
  /// `None` when title resolution failed.
  pub title:          Option<String>,
}

/// A completed dispatch: the entered target and where the attempt began.
#[derive(Debug)]
pub struct Entered<'a> {
  pub target:         &'a NavigationTarget,
  pub forwarded_from: Option<TargetId>,
}

/// Session id from [`SESSION_HEADER`]. A missing header yields a fresh,
/// never-opened id, i.e. an anonymous session.
fn session_from_headers(headers: &HeaderMap) -> Result<SessionId, Error> {
  match headers.get(SESSION_HEADER) {
    None => Ok(SessionId::new()),
    Some(value) => value
      .to_str()
      .ok()
      .and_then(|s| s.parse().ok())
      .ok_or_else(|| Error::BadRequest(format!("malformed {SESSION_HEADER}"))),
  }
}

/// Run the guard for `requested`, following forwards.
pub fn dispatch<'a>(
  state: &'a AppState,
  requested: &TargetId,
  session: &SessionId,
) -> Result<Entered<'a>, Error> {
  let mut current = state
    .targets
    .get(requested)
    .ok_or_else(|| Error::NotFound(format!("target {requested}")))?;
  let mut forwarded_from = None;

  for _ in 0..=MAX_FORWARDS {
    let decision = state.guard.check(current, session);
    let Some(next) = decision.forward_target() else {
      return Ok(Entered { target: current, forwarded_from });
    };

    tracing::debug!(from = %current.id, to = %next, "forwarding");
    forwarded_from.get_or_insert_with(|| requested.clone());
    current = state
      .targets
      .get(next)
      .ok_or_else(|| Error::NotFound(format!("target {next}")))?;
  }

  Err(Error::ForwardLoop(requested.clone()))
}

pub async fn handler(
  State(state): State<AppState>,
  Path(target): Path<String>,
  headers: HeaderMap,
) -> Result<Json<NavigationResponse>, Error> {
  let session = session_from_headers(&headers)?;
  let locale = requested_locale(&headers);

  let entered = dispatch(&state, &TargetId::from(target), &session)?;

  let mut title: Option<String> = None;
  // Failures are logged by the pipeline; the navigation still succeeds.
  let _ = state.titles.apply(entered.target, locale.as_ref(), &mut title);

  Ok(Json(NavigationResponse {
    target: entered.target.id.clone(),
    forwarded_from: entered.forwarded_from,
    title,
  }))
}
