//! `Accept-Language` → requested locale.

use axum::http::{HeaderMap, header};
use waypost_core::locale::Locale;

/// The locale named by the first `Accept-Language` entry.
///
/// Quality values are ignored. A missing header, `*`, or an unparsable tag
/// all mean "no locale requested".
pub fn requested_locale(headers: &HeaderMap) -> Option<Locale> {
  let value = headers.get(header::ACCEPT_LANGUAGE)?.to_str().ok()?;
  let first = value.split(',').next()?;
  let tag = first.split(';').next()?.trim();
  if tag.is_empty() || tag == "*" {
    return None;
  }
  Locale::parse(tag).ok().filter(|l| !l.is_root())
}
