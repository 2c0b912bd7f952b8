//! The `SessionSubjectStore` trait.
//!
//! Each session owns exactly one slot that holds at most one authenticated
//! subject. Backends (e.g. `waypost-session`) implement the trait; the guard
//! only ever talks to the abstraction.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// Opaque session handle issued by the hosting session manager.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for SessionId {
  fn default() -> Self { Self::new() }
}

impl From<Uuid> for SessionId {
  fn from(id: Uuid) -> Self { Self(id) }
}

impl FromStr for SessionId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Uuid::parse_str(s).map(Self) }
}

impl fmt::Display for SessionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

/// Session-scoped storage for the authenticated subject.
///
/// Reads and writes on one session are serialised by the backend; different
/// sessions never observe each other.
pub trait SessionSubjectStore: Send + Sync {
  /// The project-specific principal type, e.g. a `User`.
  type Subject: Clone + Send + Sync + 'static;

  /// The subject stored for `session`. `None` for an untouched, cleared or
  /// unknown session.
  fn get(&self, session: &SessionId) -> Option<Self::Subject>;

  /// Store `subject` for `session`, replacing any previous one.
  ///
  /// Returns [`Error::UnknownSession`](crate::Error::UnknownSession) if the
  /// session was never opened or has been destroyed.
  fn set(&self, session: &SessionId, subject: Self::Subject) -> Result<()>;

  /// Remove the subject for `session`, if any.
  fn clear(&self, session: &SessionId);
}
