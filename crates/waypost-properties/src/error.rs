//! Error types for the waypost-properties codec.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid escape on line {line}: {detail}")]
  InvalidEscape { line: usize, detail: String },

  #[error("failed to read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("{}: {source}", path.display())]
  Parse {
    path:   PathBuf,
    #[source]
    source: Box<Error>,
  },

  #[error("core error: {0}")]
  Core(#[from] waypost_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
