//! Locales, the supported-locale set, and the locale resolver.
//!
//! A [`Locale`] is a language subtag with an optional region. Lookups that
//! miss in a regional bundle fall back along [`Locale::fallback_chain`]:
//! `de-AT` → `de` → ROOT.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Locale ──────────────────────────────────────────────────────────────────

/// A language tag of the form `lang` or `lang-REGION`.
///
/// The ROOT locale has an empty language and no region; it is the last step
/// of every fallback chain.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
  language: String,
  region:   Option<String>,
}

impl Locale {
  /// The ROOT locale.
  pub const fn root() -> Self {
    Self { language: String::new(), region: None }
  }

  pub fn is_root(&self) -> bool { self.language.is_empty() }

  pub fn language(&self) -> &str { &self.language }

  pub fn region(&self) -> Option<&str> { self.region.as_deref() }

  /// Parse a tag such as `en`, `en-US` or `en_us`.
  ///
  /// The empty string and `und` parse to ROOT.
  pub fn parse(tag: &str) -> Result<Self> {
    let trimmed = tag.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("und") {
      return Ok(Self::root());
    }

    let mut parts = trimmed.split(['-', '_']);
    let language = parts.next().unwrap_or_default();
    let region = parts.next();
    if parts.next().is_some() {
      return Err(Error::InvalidLocale(tag.to_string()));
    }

    if !(2..=3).contains(&language.len())
      || !language.chars().all(|c| c.is_ascii_alphabetic())
    {
      return Err(Error::InvalidLocale(tag.to_string()));
    }

    let region = match region {
      None => None,
      Some(r)
        if r.len() == 2 && r.chars().all(|c| c.is_ascii_alphabetic()) =>
      {
        Some(r.to_ascii_uppercase())
      }
      Some(r) if r.len() == 3 && r.chars().all(|c| c.is_ascii_digit()) => {
        Some(r.to_string())
      }
      Some(_) => return Err(Error::InvalidLocale(tag.to_string())),
    };

    Ok(Self { language: language.to_ascii_lowercase(), region })
  }

  /// The lookup order for this locale, most specific first, always ending
  /// in ROOT.
  pub fn fallback_chain(&self) -> Vec<Locale> {
    let mut chain = Vec::with_capacity(3);
    if self.region.is_some() {
      chain.push(self.clone());
    }
    if !self.is_root() {
      chain.push(Self { language: self.language.clone(), region: None });
    }
    chain.push(Self::root());
    chain
  }
}

impl fmt::Display for Locale {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.region {
      Some(region) => write!(f, "{}-{region}", self.language),
      None => f.write_str(&self.language),
    }
  }
}

impl FromStr for Locale {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl TryFrom<String> for Locale {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::parse(&value) }
}

impl From<Locale> for String {
  fn from(locale: Locale) -> Self { locale.to_string() }
}

// ─── Supported locales ───────────────────────────────────────────────────────

/// The ordered set of locales a catalog can serve.
///
/// Order is significant: the first entry is the default used whenever the
/// requested locale is absent or unsupported. Duplicates are dropped on
/// construction, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Locale>", into = "Vec<Locale>")]
pub struct SupportedLocales(Vec<Locale>);

impl SupportedLocales {
  pub fn new(locales: impl IntoIterator<Item = Locale>) -> Self {
    let mut unique: Vec<Locale> = Vec::new();
    for locale in locales {
      if !unique.contains(&locale) {
        unique.push(locale);
      }
    }
    Self(unique)
  }

  pub fn first(&self) -> Option<&Locale> { self.0.first() }

  pub fn contains(&self, locale: &Locale) -> bool { self.0.contains(locale) }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> std::slice::Iter<'_, Locale> { self.0.iter() }

  pub fn as_slice(&self) -> &[Locale] { &self.0 }

  /// Move `default` to the front, adding it if it is not yet a member.
  pub fn with_default(self, default: Locale) -> Self {
    Self::new(std::iter::once(default).chain(self.0))
  }
}

impl From<Vec<Locale>> for SupportedLocales {
  fn from(locales: Vec<Locale>) -> Self { Self::new(locales) }
}

impl From<SupportedLocales> for Vec<Locale> {
  fn from(set: SupportedLocales) -> Self { set.0 }
}

impl FromIterator<Locale> for SupportedLocales {
  fn from_iter<I: IntoIterator<Item = Locale>>(iter: I) -> Self {
    Self::new(iter)
  }
}

impl<'a> IntoIterator for &'a SupportedLocales {
  type IntoIter = std::slice::Iter<'a, Locale>;
  type Item = &'a Locale;

  fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Choose the effective locale for a resolution.
///
/// Rules, first match wins:
///
/// 1. nothing requested and nothing supported → [`Error::NoLocaleAvailable`]
/// 2. nothing requested → the first supported locale
/// 3. requested and supported → the requested locale
/// 4. requested but unsupported → the first supported locale
///
/// `provider` names the translation source in the error message.
pub fn resolve_locale(
  requested: Option<&Locale>,
  supported: &SupportedLocales,
  provider: &str,
) -> Result<Locale> {
  let default = supported.first();

  match (requested, default) {
    (None, None) => {
      Err(Error::NoLocaleAvailable { provider: provider.to_string() })
    }
    (None, Some(default)) => Ok(default.clone()),
    (Some(requested), _) if supported.contains(requested) => {
      Ok(requested.clone())
    }
    (Some(_), Some(default)) => Ok(default.clone()),
    // Nothing supported: the catalog falls back to ROOT on lookup.
    (Some(requested), None) => Ok(requested.clone()),
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;

  fn loc(tag: &str) -> Locale { Locale::parse(tag).unwrap() }

  fn set(tags: &[&str]) -> SupportedLocales {
    tags.iter().map(|t| loc(t)).collect()
  }

  // ── Parsing ─────────────────────────────────────────────────────────────

  #[test]
  fn parses_language_and_region_case_insensitively() {
    let l = loc("EN_us");
    assert_eq!(l.language(), "en");
    assert_eq!(l.region(), Some("US"));
    assert_eq!(l.to_string(), "en-US");
  }

  #[test]
  fn empty_and_und_are_root() {
    assert!(loc("").is_root());
    assert!(loc("und").is_root());
    assert_eq!(Locale::root().to_string(), "");
  }

  #[test]
  fn rejects_malformed_tags() {
    for tag in ["e", "english", "en-USA-x", "en-U1", "1n"] {
      assert!(
        matches!(Locale::parse(tag), Err(Error::InvalidLocale(_))),
        "{tag} should be rejected"
      );
    }
  }

  #[test]
  fn numeric_region_is_accepted() {
    assert_eq!(loc("es-419").region(), Some("419"));
  }

  #[test]
  fn fallback_chain_goes_region_language_root() {
    assert_eq!(loc("de-AT").fallback_chain(), vec![
      loc("de-AT"),
      loc("de"),
      Locale::root()
    ]);
    assert_eq!(loc("de").fallback_chain(), vec![loc("de"), Locale::root()]);
    assert_eq!(Locale::root().fallback_chain(), vec![Locale::root()]);
  }

  #[test]
  fn supported_locales_drop_duplicates_keeping_order() {
    let s = set(&["de", "en", "de"]);
    assert_eq!(s.as_slice(), &[loc("de"), loc("en")]);
  }

  #[test]
  fn with_default_moves_or_adds_the_default_first() {
    assert_eq!(set(&["de", "en"]).with_default(loc("en")).as_slice(), &[
      loc("en"),
      loc("de")
    ]);
    assert_eq!(set(&["de"]).with_default(loc("fr")).as_slice(), &[
      loc("fr"),
      loc("de")
    ]);
  }

  // ── Resolution ──────────────────────────────────────────────────────────

  #[test]
  fn nothing_requested_nothing_supported_is_an_error() {
    let err = resolve_locale(None, &set(&[]), "test").unwrap_err();
    assert!(matches!(err, Error::NoLocaleAvailable { .. }));
  }

  #[test]
  fn nothing_requested_picks_first_supported() {
    assert_eq!(resolve_locale(None, &set(&["en", "de"]), "t").unwrap(), loc("en"));
  }

  #[test]
  fn supported_request_is_honoured() {
    let de = loc("de");
    assert_eq!(resolve_locale(Some(&de), &set(&["en", "de"]), "t").unwrap(), de);
  }

  #[test]
  fn unsupported_request_falls_back_to_first() {
    let fr = loc("fr");
    assert_eq!(
      resolve_locale(Some(&fr), &set(&["en", "de"]), "t").unwrap(),
      loc("en")
    );
  }

  #[test]
  fn request_without_supported_set_is_kept() {
    let fr = loc("fr");
    assert_eq!(resolve_locale(Some(&fr), &set(&[]), "t").unwrap(), fr);
  }

  fn arb_locale() -> impl Strategy<Value = Locale> {
    ("[a-z]{2}", proptest::option::of("[A-Z]{2}")).prop_map(|(l, r)| {
      let tag = match r {
        Some(r) => format!("{l}-{r}"),
        None => l,
      };
      Locale::parse(&tag).unwrap()
    })
  }

  proptest! {
    #[test]
    fn resolved_locale_is_always_supported(
      requested in proptest::option::of(arb_locale()),
      supported in proptest::collection::vec(arb_locale(), 1..6),
    ) {
      let supported = SupportedLocales::new(supported);
      let resolved = resolve_locale(requested.as_ref(), &supported, "p").unwrap();
      prop_assert!(supported.contains(&resolved));
    }
  }
}
