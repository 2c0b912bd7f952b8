//! `.properties` resource bundles for Waypost.
//!
//! Parses Java-style properties text and loads a family of locale bundles
//! from a directory into a [`waypost_core::catalog::MemoryCatalog`]. Loading
//! happens once at startup; nothing here is on the per-request path.
//!
//! # Quick start
//!
//! ```no_run
//! use waypost_properties::BundleSource;
//!
//! let catalog = BundleSource::new("i18n", "messages").load_discovered().unwrap();
//! ```

pub mod error;
mod load;
mod parse;

pub use error::{Error, Result};
pub use load::BundleSource;
use waypost_core::catalog::Bundle;

/// Parse properties text into `(key, value)` pairs in file order.
pub fn parse(input: &str) -> Result<Vec<(String, String)>> {
  parse::parse_entries(input)
}

/// Parse properties text into a bundle. Later duplicate keys win.
pub fn parse_bundle(input: &str) -> Result<Bundle> {
  Ok(parse(input)?.into_iter().collect())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn later_duplicates_override_earlier_ones() {
    let bundle = parse_bundle("k=first\nk=second\n").unwrap();
    assert_eq!(bundle.get("k").map(String::as_str), Some("second"));
    assert_eq!(bundle.len(), 1);
  }
}
