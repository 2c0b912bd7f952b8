//! Error types for `waypost-core`.

use thiserror::Error;

use crate::{session::SessionId, target::TargetId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("no title metadata found for target {0}")]
  NoMetadata(TargetId),

  #[error(
    "no locale requested and the supported locale list of {provider} is empty"
  )]
  NoLocaleAvailable { provider: String },

  #[error("could not instantiate title formatter {formatter}: {reason}")]
  FormatterInstantiationFailed { formatter: String, reason: String },

  #[error("title formatter {formatter} failed: {reason}")]
  FormatterApplicationFailed { formatter: String, reason: String },

  #[error("invalid locale tag: {0:?}")]
  InvalidLocale(String),

  #[error("unknown session: {0}")]
  UnknownSession(SessionId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
