//! The `TranslationCatalog` trait and an in-memory implementation.
//!
//! Translation never fails. Degenerate keys resolve to sentinel strings that
//! carry the reserved [`SENTINEL_PREFIX`], so a missing translation shows up
//! on screen as a marked placeholder instead of a blank.

use std::collections::HashMap;

use crate::locale::{Locale, SupportedLocales};

// ─── Sentinels ───────────────────────────────────────────────────────────────

/// Prefix shared by every sentinel string.
pub const SENTINEL_PREFIX: &str = "###-";

/// Returned when translation is asked for a null key.
pub const NULL_KEY: &str = "###-NULL-KEY-###";

/// Returned when translation is asked for an empty key.
pub const EMPTY_KEY: &str = "###-EMPTY-KEY-###";

/// The sentinel for a key missing from every bundle on the locale's chain.
pub fn key_not_found(key: &str, locale: &Locale) -> String {
  format!("{SENTINEL_PREFIX}KEY_NOT_FOUND-{key} - {locale}-###")
}

/// Whether `s` is one of the sentinel strings produced by
/// [`TranslationCatalog::translate`].
pub fn is_sentinel(s: &str) -> bool {
  s.starts_with(SENTINEL_PREFIX) && s.ends_with("###")
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A read-only, locale-keyed string store.
///
/// Implementors supply [`lookup`](Self::lookup); the sentinel rules in
/// [`translate`](Self::translate) are shared by every backend.
pub trait TranslationCatalog: Send + Sync {
  /// Human-readable name of the backing source, used in diagnostics.
  fn name(&self) -> &str;

  /// The locales this catalog serves, default first.
  fn provided_locales(&self) -> &SupportedLocales;

  /// Raw lookup of `key`, walking `locale`'s fallback chain.
  fn lookup(&self, key: &str, locale: &Locale) -> Option<&str>;

  /// Translate `key` for `locale`.
  ///
  /// - `None` → [`NULL_KEY`]
  /// - `""` → [`EMPTY_KEY`]
  /// - not found → [`key_not_found`]
  fn translate(&self, key: Option<&str>, locale: &Locale) -> String {
    match key {
      None => NULL_KEY.to_string(),
      Some("") => EMPTY_KEY.to_string(),
      Some(key) => match self.lookup(key, locale) {
        Some(value) => value.to_string(),
        None => key_not_found(key, locale),
      },
    }
  }

  /// Translate `key` and substitute `{name}` placeholders from `args`.
  ///
  /// Sentinels are returned as-is.
  fn translate_with_args(
    &self,
    key: Option<&str>,
    locale: &Locale,
    args: &[(&str, &str)],
  ) -> String {
    let text = self.translate(key, locale);
    if is_sentinel(&text) {
      return text;
    }
    substitute(&text, args)
  }
}

/// Replace every `{name}` in `text` with the matching value from `args`.
pub fn substitute(text: &str, args: &[(&str, &str)]) -> String {
  let mut result = text.to_string();
  for (name, value) in args {
    result = result.replace(&format!("{{{name}}}"), value);
  }
  result
}

// ─── In-memory catalog ───────────────────────────────────────────────────────

/// A single locale's `key → string` mapping.
pub type Bundle = HashMap<String, String>;

/// A catalog held entirely in memory, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
  name:      String,
  supported: SupportedLocales,
  bundles:   HashMap<Locale, Bundle>,
}

impl MemoryCatalog {
  pub fn new(name: impl Into<String>, supported: SupportedLocales) -> Self {
    Self { name: name.into(), supported, bundles: HashMap::new() }
  }

  /// Merge `entries` into the bundle for `locale`. Later entries win.
  pub fn with_bundle<K, V>(
    mut self,
    locale: Locale,
    entries: impl IntoIterator<Item = (K, V)>,
  ) -> Self
  where
    K: Into<String>,
    V: Into<String>,
  {
    self.insert_bundle(locale, entries);
    self
  }

  pub fn insert_bundle<K, V>(
    &mut self,
    locale: Locale,
    entries: impl IntoIterator<Item = (K, V)>,
  ) where
    K: Into<String>,
    V: Into<String>,
  {
    let bundle = self.bundles.entry(locale).or_default();
    bundle.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
  }
}

impl TranslationCatalog for MemoryCatalog {
  fn name(&self) -> &str { &self.name }

  fn provided_locales(&self) -> &SupportedLocales { &self.supported }

  fn lookup(&self, key: &str, locale: &Locale) -> Option<&str> {
    locale.fallback_chain().iter().find_map(|candidate| {
      self
        .bundles
        .get(candidate)
        .and_then(|bundle| bundle.get(key))
        .map(String::as_str)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn loc(tag: &str) -> Locale { Locale::parse(tag).unwrap() }

  fn catalog() -> MemoryCatalog {
    MemoryCatalog::new("test", SupportedLocales::new([loc("en"), loc("de")]))
      .with_bundle(Locale::root(), [("app.name", "Waypost")])
      .with_bundle(loc("en"), [("greeting", "Hi"), ("welcome", "Hello {user}")])
      .with_bundle(loc("de"), [("greeting", "Hallo")])
      .with_bundle(loc("de-AT"), [("greeting", "Servus")])
  }

  #[test]
  fn null_key_yields_sentinel() {
    assert_eq!(catalog().translate(None, &loc("en")), "###-NULL-KEY-###");
  }

  #[test]
  fn empty_key_yields_sentinel() {
    assert_eq!(catalog().translate(Some(""), &loc("en")), "###-EMPTY-KEY-###");
  }

  #[test]
  fn missing_key_embeds_key_and_locale() {
    let s = catalog().translate(Some("missing.key"), &loc("en"));
    assert!(s.contains("KEY_NOT_FOUND-missing.key"), "{s}");
    assert!(s.contains(" - en"), "{s}");
    assert!(is_sentinel(&s));
  }

  #[test]
  fn present_key_returns_value() {
    assert_eq!(catalog().translate(Some("greeting"), &loc("en")), "Hi");
  }

  #[test]
  fn lookup_walks_region_language_root() {
    let c = catalog();
    assert_eq!(c.translate(Some("greeting"), &loc("de-AT")), "Servus");
    assert_eq!(c.translate(Some("greeting"), &loc("de-DE")), "Hallo");
    assert_eq!(c.translate(Some("app.name"), &loc("de-DE")), "Waypost");
  }

  #[test]
  fn args_are_substituted() {
    let s = catalog().translate_with_args(
      Some("welcome"),
      &loc("en"),
      &[("user", "alice")],
    );
    assert_eq!(s, "Hello alice");
  }

  #[test]
  fn args_leave_sentinels_untouched() {
    let s = catalog().translate_with_args(None, &loc("en"), &[("user", "x")]);
    assert_eq!(s, NULL_KEY);
  }

  #[test]
  fn ordinary_strings_are_not_sentinels() {
    assert!(!is_sentinel("Dashboard"));
    assert!(!is_sentinel("### heading"));
  }
}
