//! Navigation targets and their registration-time metadata.
//!
//! A target's restriction flag and title metadata are fixed when the target
//! is registered and never change at runtime.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::formatter::FormatterRef;

/// Stable identifier of a navigation target, e.g. `"dashboard"`.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for TargetId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for TargetId {
  fn from(id: &str) -> Self { Self(id.to_string()) }
}

impl From<String> for TargetId {
  fn from(id: String) -> Self { Self(id) }
}

/// Declarative title for a target.
#[derive(Debug, Clone, Default)]
pub struct TitleMetadata {
  /// Catalog key. Empty means `default_value` is used verbatim.
  pub message_key:   String,
  /// Pre-resolved literal title.
  pub default_value: String,
  pub formatter:     FormatterRef,
}

impl TitleMetadata {
  pub fn keyed(message_key: impl Into<String>) -> Self {
    Self { message_key: message_key.into(), ..Self::default() }
  }

  pub fn literal(default_value: impl Into<String>) -> Self {
    Self { default_value: default_value.into(), ..Self::default() }
  }

  pub fn with_formatter(mut self, formatter: FormatterRef) -> Self {
    self.formatter = formatter;
    self
  }
}

/// A destination the guard can authorize and the title pipeline can title.
#[derive(Debug, Clone)]
pub struct NavigationTarget {
  pub id:         TargetId,
  /// Whether entering this target requires an authenticated subject.
  pub restricted: bool,
  pub title:      Option<TitleMetadata>,
}

impl NavigationTarget {
  pub fn open(id: impl Into<TargetId>) -> Self {
    Self { id: id.into(), restricted: false, title: None }
  }

  pub fn restricted(id: impl Into<TargetId>) -> Self {
    Self { id: id.into(), restricted: true, title: None }
  }

  pub fn with_title(mut self, title: TitleMetadata) -> Self {
    self.title = Some(title);
    self
  }
}

/// Lookup table of every registered target.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
  targets: HashMap<TargetId, NavigationTarget>,
}

impl TargetRegistry {
  pub fn new() -> Self { Self::default() }

  /// Register `target`, returning the target it replaced, if any.
  pub fn register(
    &mut self,
    target: NavigationTarget,
  ) -> Option<NavigationTarget> {
    self.targets.insert(target.id.clone(), target)
  }

  pub fn get(&self, id: &TargetId) -> Option<&NavigationTarget> {
    self.targets.get(id)
  }

  pub fn contains(&self, id: &TargetId) -> bool {
    self.targets.contains_key(id)
  }

  pub fn len(&self) -> usize { self.targets.len() }

  pub fn is_empty(&self) -> bool { self.targets.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &NavigationTarget> {
    self.targets.values()
  }
}

impl FromIterator<NavigationTarget> for TargetRegistry {
  fn from_iter<I: IntoIterator<Item = NavigationTarget>>(iter: I) -> Self {
    let mut registry = Self::new();
    for target in iter {
      registry.register(target);
    }
    registry
  }
}
