//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use waypost_core::target::TargetId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("not found: {0}")]
  NotFound(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("navigation to {0} kept forwarding")]
  ForwardLoop(TargetId),
  #[error("invalid configuration: {0}")]
  Config(String),
  #[error("bundle error: {0}")]
  Bundle(#[from] waypost_properties::Error),
  #[error(transparent)]
  Session(#[from] waypost_session::Error),
  #[error(transparent)]
  Core(#[from] waypost_core::Error),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::ForwardLoop(_) => StatusCode::LOOP_DETECTED,
      Error::Session(waypost_session::Error::Full { .. }) => {
        StatusCode::SERVICE_UNAVAILABLE
      }
      Error::Core(waypost_core::Error::UnknownSession(_)) => StatusCode::NOT_FOUND,
      Error::Config(_) | Error::Bundle(_) | Error::Session(_) | Error::Core(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
