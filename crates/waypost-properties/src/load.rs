//! Resource-bundle discovery and loading.
//!
//! A bundle family shares a base name and lives in one directory:
//!
//! ```text
//! messages.properties         ROOT
//! messages_en.properties      en
//! messages_de_AT.properties   de-AT
//! ```

use std::{
  fs,
  path::{Path, PathBuf},
};

use waypost_core::{
  catalog::MemoryCatalog,
  locale::{Locale, SupportedLocales},
};

use crate::{
  error::{Error, Result},
  parse_bundle,
};

const EXTENSION: &str = ".properties";

/// A directory plus base name identifying one bundle family.
#[derive(Debug, Clone)]
pub struct BundleSource {
  dir:       PathBuf,
  base_name: String,
}

impl BundleSource {
  pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
    Self { dir: dir.into(), base_name: base_name.into() }
  }

  pub fn dir(&self) -> &Path { &self.dir }

  pub fn base_name(&self) -> &str { &self.base_name }

  /// File name holding `locale`'s entries.
  pub fn file_name(&self, locale: &Locale) -> String {
    match (locale.is_root(), locale.region()) {
      (true, _) => format!("{}{EXTENSION}", self.base_name),
      (false, None) => {
        format!("{}_{}{EXTENSION}", self.base_name, locale.language())
      }
      (false, Some(region)) => format!(
        "{}_{}_{region}{EXTENSION}",
        self.base_name,
        locale.language()
      ),
    }
  }

  pub fn path(&self, locale: &Locale) -> PathBuf {
    self.dir.join(self.file_name(locale))
  }

  /// Locales with a bundle file on disk, sorted, ROOT excluded.
  pub fn discover(&self) -> Result<SupportedLocales> {
    let entries = fs::read_dir(&self.dir).map_err(|source| Error::Io {
      path: self.dir.clone(),
      source,
    })?;

    let prefix = format!("{}_", self.base_name);
    let mut locales = Vec::new();
    for entry in entries {
      let entry = entry.map_err(|source| Error::Io {
        path: self.dir.clone(),
        source,
      })?;
      let name = entry.file_name();
      let Some(tag) = name
        .to_str()
        .and_then(|n| n.strip_prefix(&prefix))
        .and_then(|n| n.strip_suffix(EXTENSION))
      else {
        continue;
      };
      match Locale::parse(tag) {
        Ok(locale) if !locale.is_root() => locales.push(locale),
        Ok(_) => {}
        Err(e) => tracing::debug!(file = ?name, error = %e, "skipping bundle file"),
      }
    }

    locales.sort();
    Ok(SupportedLocales::new(locales))
  }

  /// Load every bundle along each supported locale's fallback chain.
  ///
  /// A supported locale without a file of its own only logs a warning; its
  /// lookups fall through to the language or ROOT bundle.
  pub fn load(&self, supported: SupportedLocales) -> Result<MemoryCatalog> {
    let name = format!("properties:{}", self.dir.join(&self.base_name).display());
    let mut catalog = MemoryCatalog::new(name, supported.clone());
    let mut loaded: Vec<Locale> = Vec::new();

    for locale in &supported {
      if !self.path(locale).is_file() {
        tracing::warn!(
          %locale,
          file = %self.file_name(locale),
          "no bundle file for supported locale"
        );
      }

      for candidate in locale.fallback_chain() {
        if loaded.contains(&candidate) {
          continue;
        }
        let path = self.path(&candidate);
        if !path.is_file() {
          continue;
        }
        let text = fs::read_to_string(&path).map_err(|source| Error::Io {
          path: path.clone(),
          source,
        })?;
        let bundle = parse_bundle(&text).map_err(|e| Error::Parse {
          path:   path.clone(),
          source: Box::new(e),
        })?;
        tracing::info!(
          locale = %candidate,
          file = %path.display(),
          keys = bundle.len(),
          "loaded bundle"
        );
        catalog.insert_bundle(candidate.clone(), bundle);
        loaded.push(candidate);
      }
    }

    Ok(catalog)
  }

  /// [`discover`](Self::discover) then [`load`](Self::load).
  pub fn load_discovered(&self) -> Result<MemoryCatalog> {
    let supported = self.discover()?;
    self.load(supported)
  }
}

#[cfg(test)]
mod tests {
  use waypost_core::catalog::TranslationCatalog;

  use super::*;

  fn loc(tag: &str) -> Locale { Locale::parse(tag).unwrap() }

  fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
  }

  fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "messages.properties", "app.name=Waypost\n");
    write(dir.path(), "messages_en.properties", "title.dashboard=Dashboard\n");
    write(dir.path(), "messages_de.properties", "title.dashboard=Übersicht\n");
    write(dir.path(), "messages_de_AT.properties", "title.login=Anmeldung\n");
    write(dir.path(), "other_fr.properties", "title.dashboard=Tableau\n");
    write(dir.path(), "messages_not-a-locale!.properties", "x=y\n");
    dir
  }

  #[test]
  fn file_names_follow_locale() {
    let src = BundleSource::new("/tmp", "messages");
    assert_eq!(src.file_name(&Locale::root()), "messages.properties");
    assert_eq!(src.file_name(&loc("en")), "messages_en.properties");
    assert_eq!(src.file_name(&loc("de-AT")), "messages_de_AT.properties");
  }

  #[test]
  fn discover_lists_only_this_family() {
    let dir = fixture();
    let found = BundleSource::new(dir.path(), "messages").discover().unwrap();
    assert_eq!(found.as_slice(), &[loc("de"), loc("de-AT"), loc("en")]);
  }

  #[test]
  fn load_walks_fallback_chain() {
    let dir = fixture();
    let catalog = BundleSource::new(dir.path(), "messages")
      .load(SupportedLocales::new([loc("en"), loc("de-AT")]))
      .unwrap();

    let at = loc("de-AT");
    assert_eq!(catalog.translate(Some("title.login"), &at), "Anmeldung");
    assert_eq!(catalog.translate(Some("title.dashboard"), &at), "Übersicht");
    assert_eq!(catalog.translate(Some("app.name"), &at), "Waypost");
    assert_eq!(catalog.provided_locales().first(), Some(&loc("en")));
  }

  #[test]
  fn supported_locale_without_file_still_loads() {
    let dir = fixture();
    let catalog = BundleSource::new(dir.path(), "messages")
      .load(SupportedLocales::new([loc("it")]))
      .unwrap();
    assert_eq!(catalog.translate(Some("app.name"), &loc("it")), "Waypost");
  }

  #[test]
  fn bad_file_reports_path() {
    let dir = fixture();
    write(dir.path(), "messages_en.properties", "k=\\uZZZZ\n");
    let err = BundleSource::new(dir.path(), "messages")
      .load(SupportedLocales::new([loc("en")]))
      .unwrap_err();
    assert!(err.to_string().contains("messages_en.properties"), "{err}");
  }

  #[test]
  fn missing_directory_is_an_io_error() {
    let err = BundleSource::new("/definitely/not/here", "messages")
      .discover()
      .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
  }
}
