//! Session lifecycle: open, destroy, login, logout.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use waypost_core::session::{SessionId, SessionSubjectStore};

use crate::{
  AppState, User,
  auth::{Credentials, verify_credentials},
  error::Error,
};

#[derive(Serialize)]
pub struct SessionCreated {
  pub session_id: SessionId,
}

/// `POST /sessions`
pub async fn create(
  State(state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
  let session_id = state.sessions.open()?;
  Ok((StatusCode::CREATED, Json(SessionCreated { session_id })))
}

/// `DELETE /sessions/{id}`
pub async fn destroy(
  State(state): State<AppState>,
  Path(id): Path<SessionId>,
) -> Result<StatusCode, Error> {
  if !state.sessions.destroy(&id) {
    return Err(Error::NotFound(format!("session {id}")));
  }
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /sessions/{id}/login`
pub async fn login(
  State(state): State<AppState>,
  Path(id): Path<SessionId>,
  Json(creds): Json<Credentials>,
) -> Result<StatusCode, Error> {
  if !state.sessions.is_open(&id) {
    return Err(Error::NotFound(format!("session {id}")));
  }

  if let Err(e) = verify_credentials(&creds, &state.auth) {
    tracing::info!(session = %id, username = %creds.username, "login rejected");
    return Err(e);
  }

  state.sessions.set(&id, User {
    username:         creds.username.clone(),
    authenticated_at: Utc::now(),
  })?;
  tracing::info!(session = %id, username = %creds.username, "logged in");
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /sessions/{id}/logout`
pub async fn logout(
  State(state): State<AppState>,
  Path(id): Path<SessionId>,
) -> Result<StatusCode, Error> {
  if !state.sessions.is_open(&id) {
    return Err(Error::NotFound(format!("session {id}")));
  }
  state.sessions.clear(&id);
  tracing::info!(session = %id, "logged out");
  Ok(StatusCode::NO_CONTENT)
}
