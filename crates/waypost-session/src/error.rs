//! Error type for `waypost-session`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] waypost_core::Error),

  #[error("session store is full ({limit} sessions)")]
  Full { limit: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
