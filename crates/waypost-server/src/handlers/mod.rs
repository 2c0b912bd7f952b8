//! Route handlers, one module per resource.
//!
//! Each handler returns `Result<impl IntoResponse, Error>`; the error's
//! `IntoResponse` impl picks the status code.

pub mod navigate;
pub mod sessions;
