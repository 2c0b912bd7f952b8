//! In-memory session backend for Waypost.
//!
//! Implements [`waypost_core::session::SessionSubjectStore`] with one lock per
//! session slot, so concurrent attempts in different sessions never contend.
//! Idle sessions are evicted and the number of open sessions is capped by
//! [`SessionLimits`].

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{MemorySessionStore, SessionLimits};
