//! Core types and decision logic for Waypost.
//!
//! Two independent pipelines live here: the [`guard`] that authorizes a
//! navigation attempt against a session's subject, and the [`title`]
//! pipeline that turns a target's title metadata and a requested locale into
//! a display string.
//!
//! Nothing here touches HTTP, the filesystem or a session backend. Hosts
//! inject those as trait implementations.

pub mod catalog;
pub mod error;
pub mod formatter;
pub mod guard;
pub mod locale;
pub mod session;
pub mod target;
pub mod title;

pub use error::{Error, Result};
