//! Title formatter strategies and the registry that resolves them.
//!
//! A formatter turns `(catalog, locale, key)` into the final title. Targets
//! name their formatter through a [`FormatterRef`]; the reference is resolved
//! against a [`FormatterRegistry`] before formatting.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
  Error, Result,
  catalog::{TranslationCatalog, is_sentinel},
  locale::Locale,
};

/// Why a formatter could not produce a title.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct FormatError(pub String);

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A strategy that produces a title string from a message key.
///
/// Implementations must not panic; failures are reported as
/// [`FormatError`].
pub trait TitleFormatter: Send + Sync {
  /// Name used in logs and error messages.
  fn name(&self) -> &str;

  fn format(
    &self,
    catalog: &dyn TranslationCatalog,
    locale: &Locale,
    key: &str,
  ) -> Result<String, FormatError>;
}

// ─── Built-in strategies ─────────────────────────────────────────────────────

/// Plain translation of the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTitleFormatter;

impl TitleFormatter for DefaultTitleFormatter {
  fn name(&self) -> &str { "default" }

  fn format(
    &self,
    catalog: &dyn TranslationCatalog,
    locale: &Locale,
    key: &str,
  ) -> Result<String, FormatError> {
    Ok(catalog.translate(Some(key), locale))
  }
}

/// Like [`DefaultTitleFormatter`], but a sentinel result is a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictTitleFormatter;

impl TitleFormatter for StrictTitleFormatter {
  fn name(&self) -> &str { "strict" }

  fn format(
    &self,
    catalog: &dyn TranslationCatalog,
    locale: &Locale,
    key: &str,
  ) -> Result<String, FormatError> {
    let title = catalog.translate(Some(key), locale);
    if is_sentinel(&title) {
      return Err(FormatError(format!("unresolved translation {title}")));
    }
    Ok(title)
  }
}

/// Placeholder a suffixed title may use to position the suffix itself.
pub const SUFFIX_PLACEHOLDER: &str = "suffix";

/// Appends a second translated key, e.g. `"Dashboard | Waypost"`.
///
/// A title containing `{suffix}` gets the suffix substituted in place
/// instead, e.g. `"About {suffix}"` → `"About Waypost"`.
#[derive(Debug, Clone)]
pub struct SuffixedTitleFormatter {
  pub suffix_key: String,
  pub separator:  String,
}

impl SuffixedTitleFormatter {
  pub fn new(suffix_key: impl Into<String>, separator: impl Into<String>) -> Self {
    Self { suffix_key: suffix_key.into(), separator: separator.into() }
  }
}

impl TitleFormatter for SuffixedTitleFormatter {
  fn name(&self) -> &str { "suffixed" }

  fn format(
    &self,
    catalog: &dyn TranslationCatalog,
    locale: &Locale,
    key: &str,
  ) -> Result<String, FormatError> {
    let title = catalog.translate(Some(key), locale);
    if is_sentinel(&title) {
      return Ok(title);
    }
    let suffix = catalog.translate(Some(&self.suffix_key), locale);
    if is_sentinel(&suffix) {
      // Missing suffix: the bare title is still usable.
      return Ok(title);
    }
    if title.contains(&format!("{{{SUFFIX_PLACEHOLDER}}}")) {
      return Ok(catalog.translate_with_args(Some(key), locale, &[(
        SUFFIX_PLACEHOLDER,
        suffix.as_str(),
      )]));
    }
    Ok(format!("{title}{}{suffix}", self.separator))
  }
}

// ─── References & registry ───────────────────────────────────────────────────

/// How a target refers to its formatter.
#[derive(Clone, Default)]
pub enum FormatterRef {
  /// [`DefaultTitleFormatter`].
  #[default]
  Default,
  /// A formatter registered under this name.
  Named(String),
  /// An injected instance.
  Instance(Arc<dyn TitleFormatter>),
}

impl fmt::Debug for FormatterRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Default => f.write_str("Default"),
      Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
      Self::Instance(inner) => {
        f.debug_tuple("Instance").field(&inner.name()).finish()
      }
    }
  }
}

impl From<Option<String>> for FormatterRef {
  fn from(name: Option<String>) -> Self {
    match name {
      None => Self::Default,
      Some(name) if name.is_empty() || name == "default" => Self::Default,
      Some(name) => Self::Named(name),
    }
  }
}

/// Named formatters available to targets.
///
/// A new registry already holds `default` and `strict`.
#[derive(Clone)]
pub struct FormatterRegistry {
  formatters: HashMap<String, Arc<dyn TitleFormatter>>,
}

impl Default for FormatterRegistry {
  fn default() -> Self { Self::new() }
}

impl FormatterRegistry {
  pub fn new() -> Self {
    let mut registry = Self { formatters: HashMap::new() };
    registry.register("default", Arc::new(DefaultTitleFormatter));
    registry.register("strict", Arc::new(StrictTitleFormatter));
    registry
  }

  /// Register `formatter` under `name`, replacing any previous entry.
  pub fn register(
    &mut self,
    name: impl Into<String>,
    formatter: Arc<dyn TitleFormatter>,
  ) {
    self.formatters.insert(name.into(), formatter);
  }

  pub fn contains(&self, name: &str) -> bool {
    self.formatters.contains_key(name)
  }

  /// Resolve a reference to a usable formatter.
  pub fn resolve(
    &self,
    reference: &FormatterRef,
  ) -> Result<Arc<dyn TitleFormatter>> {
    match reference {
      FormatterRef::Default => Ok(Arc::new(DefaultTitleFormatter)),
      FormatterRef::Instance(formatter) => Ok(Arc::clone(formatter)),
      FormatterRef::Named(name) => {
        self.formatters.get(name).cloned().ok_or_else(|| {
          Error::FormatterInstantiationFailed {
            formatter: name.clone(),
            reason:    "no formatter registered under this name".to_string(),
          }
        })
      }
    }
  }
}
