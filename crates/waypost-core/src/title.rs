//! Title resolution for an entered target.
//!
//! Pipeline:
//!   NavigationTarget
//!     └─ effective_key()      → literal title, or message key
//!          └─ resolve_locale() → effective locale
//!               └─ FormatterRegistry::resolve() → formatter
//!                    └─ TitleFormatter::format() → title
//!                         └─ TitleSink::set_title()
//!
//! Every stage yields a `Result`; the first failure stops the pipeline and
//! nothing is applied.

use std::sync::Arc;

use crate::{
  Error, Result,
  catalog::{EMPTY_KEY, TranslationCatalog},
  formatter::FormatterRegistry,
  locale::{Locale, resolve_locale},
  target::{NavigationTarget, TitleMetadata},
};

/// Receives the resolved title of the active UI context.
pub trait TitleSink {
  fn set_title(&mut self, title: &str);
}

/// Captures the applied title; handy for hosts that render it later.
impl TitleSink for Option<String> {
  fn set_title(&mut self, title: &str) { *self = Some(title.to_string()); }
}

/// What the pipeline will turn into a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EffectiveKey<'a> {
  /// Pre-resolved text, applied without translation.
  Literal(&'a str),
  /// A catalog key, translated through the target's formatter.
  Message(&'a str),
}

fn effective_key(meta: &TitleMetadata) -> EffectiveKey<'_> {
  if meta.message_key.is_empty() {
    EffectiveKey::Literal(&meta.default_value)
  } else {
    EffectiveKey::Message(&meta.message_key)
  }
}

/// Resolves and applies localized titles.
///
/// The catalog and formatter registry are loaded once and shared read-only
/// by every resolution.
#[derive(Clone)]
pub struct TitlePipeline {
  catalog:    Arc<dyn TranslationCatalog>,
  formatters: FormatterRegistry,
}

impl TitlePipeline {
  pub fn new(
    catalog: Arc<dyn TranslationCatalog>,
    formatters: FormatterRegistry,
  ) -> Self {
    Self { catalog, formatters }
  }

  /// Compute the title for `target` without applying it.
  pub fn resolve(
    &self,
    target: &NavigationTarget,
    requested: Option<&Locale>,
  ) -> Result<String> {
    let meta = target
      .title
      .as_ref()
      .ok_or_else(|| Error::NoMetadata(target.id.clone()))?;

    let key = match effective_key(meta) {
      EffectiveKey::Literal("") => return Ok(EMPTY_KEY.to_string()),
      EffectiveKey::Literal(text) => return Ok(text.to_string()),
      EffectiveKey::Message(key) => key,
    };

    let locale = resolve_locale(
      requested,
      self.catalog.provided_locales(),
      self.catalog.name(),
    )?;

    let formatter = self.formatters.resolve(&meta.formatter)?;

    formatter
      .format(self.catalog.as_ref(), &locale, key)
      .map_err(|e| Error::FormatterApplicationFailed {
        formatter: formatter.name().to_string(),
        reason:    e.to_string(),
      })
  }

  /// Resolve the title for `target` and hand it to `sink`.
  ///
  /// `sink` is called exactly once on success and never on failure. Failures
  /// are logged and returned; they never stop the navigation.
  pub fn apply(
    &self,
    target: &NavigationTarget,
    requested: Option<&Locale>,
    sink: &mut dyn TitleSink,
  ) -> Result<String> {
    match self.resolve(target, requested) {
      Ok(title) => {
        tracing::debug!(target = %target.id, %title, "applying title");
        sink.set_title(&title);
        Ok(title)
      }
      Err(e) => {
        tracing::info!(target = %target.id, error = %e, "title not resolved");
        Err(e)
      }
    }
  }
}
