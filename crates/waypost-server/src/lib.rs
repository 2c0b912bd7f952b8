//! HTTP host for the Waypost navigation core.
//!
//! Exposes an axum [`Router`] that owns sessions, performs login and logout,
//! and dispatches navigation attempts through the guard and the title
//! pipeline.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod language;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use waypost_core::{
  catalog::{MemoryCatalog, TranslationCatalog},
  formatter::{FormatterRef, FormatterRegistry, SuffixedTitleFormatter},
  guard::{GuardConfig, NavigationGuard},
  locale::{Locale, SupportedLocales},
  target::{NavigationTarget, TargetId, TargetRegistry, TitleMetadata},
  title::TitlePipeline,
};
use waypost_properties::BundleSource;
use waypost_session::{MemorySessionStore, SessionLimits};

use auth::AuthConfig;
use handlers::{navigate, sessions};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_base_name() -> String { "messages".to_string() }

fn default_separator() -> String { " | ".to_string() }

fn default_max_sessions() -> usize { SessionLimits::default().max_sessions }

fn default_idle_timeout_secs() -> u64 {
  SessionLimits::default().idle_timeout.as_secs()
}

/// Runtime server configuration, deserialised from `waypost.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub bundle_dir:         PathBuf,
  #[serde(default = "default_base_name")]
  pub bundle_base_name:   String,
  /// Default first. Discovered from the bundle files when empty, in which
  /// case the order is alphabetical unless `default_locale` is set.
  #[serde(default)]
  pub supported_locales:  Vec<Locale>,
  /// Moved to the front of the supported locales, making it the fallback.
  #[serde(default)]
  pub default_locale:     Option<Locale>,
  pub login_target:       TargetId,
  pub default_target:     TargetId,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Registers the `suffixed` formatter, appending this key's translation.
  #[serde(default)]
  pub title_suffix_key:   Option<String>,
  #[serde(default = "default_separator")]
  pub title_separator:    String,
  #[serde(default = "default_max_sessions")]
  pub max_sessions:       usize,
  #[serde(default = "default_idle_timeout_secs")]
  pub session_idle_secs:  u64,
  #[serde(default)]
  pub targets:            Vec<TargetConfig>,
}

/// One `[[targets]]` entry.
#[derive(Debug, Deserialize, Clone)]
pub struct TargetConfig {
  pub id:         TargetId,
  #[serde(default)]
  pub restricted: bool,
  #[serde(default)]
  pub title:      Option<TitleConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TitleConfig {
  #[serde(default)]
  pub message_key:   String,
  #[serde(default)]
  pub default_value: String,
  /// Registry name; `default` when omitted.
  #[serde(default)]
  pub formatter:     Option<String>,
}

impl ServerConfig {
  pub fn guard_config(&self) -> GuardConfig {
    GuardConfig {
      login_target:   self.login_target.clone(),
      default_target: self.default_target.clone(),
    }
  }

  pub fn auth_config(&self) -> AuthConfig {
    AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    }
  }

  pub fn session_limits(&self) -> SessionLimits {
    SessionLimits {
      max_sessions: self.max_sessions,
      idle_timeout: Duration::from_secs(self.session_idle_secs),
    }
  }

  /// Load the bundle family under `bundle_dir`.
  ///
  /// `bundle_dir` is taken as given; expanding `~` is the caller's job.
  pub fn load_catalog(&self) -> Result<MemoryCatalog, Error> {
    let source = BundleSource::new(&self.bundle_dir, self.bundle_base_name.clone());
    let supported = if self.supported_locales.is_empty() {
      source.discover()?
    } else {
      SupportedLocales::new(self.supported_locales.clone())
    };
    let supported = match &self.default_locale {
      Some(default) => supported.with_default(default.clone()),
      None => supported,
    };
    Ok(source.load(supported)?)
  }

  /// Formatters available to targets: the built-ins plus `suffixed` when a
  /// suffix key is configured.
  pub fn formatters(&self) -> FormatterRegistry {
    let mut registry = FormatterRegistry::new();
    if let Some(key) = &self.title_suffix_key {
      registry.register(
        "suffixed",
        Arc::new(SuffixedTitleFormatter::new(key.clone(), self.title_separator.clone())),
      );
    }
    registry
  }

  /// Turn `[[targets]]` into a registry, validating it against the guard
  /// configuration and `formatters`.
  pub fn build_targets(
    &self,
    formatters: &FormatterRegistry,
  ) -> Result<TargetRegistry, Error> {
    let mut registry = TargetRegistry::new();
    for cfg in &self.targets {
      let title = match &cfg.title {
        None => None,
        Some(title) => {
          let formatter = FormatterRef::from(title.formatter.clone());
          if let FormatterRef::Named(name) = &formatter
            && !formatters.contains(name)
          {
            return Err(Error::Config(format!(
              "target {} uses unknown formatter {name:?}",
              cfg.id
            )));
          }
          Some(TitleMetadata {
            message_key:   title.message_key.clone(),
            default_value: title.default_value.clone(),
            formatter,
          })
        }
      };

      let target = NavigationTarget {
        id: cfg.id.clone(),
        restricted: cfg.restricted,
        title,
      };
      if registry.register(target).is_some() {
        return Err(Error::Config(format!("duplicate target {}", cfg.id)));
      }
    }

    for (role, id) in [
      ("login_target", &self.login_target),
      ("default_target", &self.default_target),
    ] {
      if !registry.contains(id) {
        return Err(Error::Config(format!("{role} {id} is not a registered target")));
      }
    }
    if self.login_target == self.default_target {
      return Err(Error::Config(
        "login_target and default_target must differ".to_string(),
      ));
    }

    Ok(registry)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// The authenticated principal stored in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub username:         String,
  pub authenticated_at: DateTime<Utc>,
}

pub type Sessions = MemorySessionStore<User>;

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
  pub sessions: Arc<Sessions>,
  pub guard:    Arc<NavigationGuard<Sessions>>,
  pub targets:  Arc<TargetRegistry>,
  pub titles:   Arc<TitlePipeline>,
  pub auth:     Arc<AuthConfig>,
}

impl AppState {
  /// Assemble state from already-validated parts.
  pub fn new(
    guard_config: GuardConfig,
    targets: TargetRegistry,
    titles: TitlePipeline,
    auth: AuthConfig,
    limits: SessionLimits,
  ) -> Self {
    let sessions = Arc::new(Sessions::with_limits(limits));
    Self {
      guard: Arc::new(NavigationGuard::new(Arc::clone(&sessions), guard_config)),
      sessions,
      targets: Arc::new(targets),
      titles: Arc::new(titles),
      auth: Arc::new(auth),
    }
  }

  /// Validate `config` and build state around `catalog`.
  pub fn from_config(
    config: &ServerConfig,
    catalog: Arc<dyn TranslationCatalog>,
  ) -> Result<Self, Error> {
    let formatters = config.formatters();
    let targets = config.build_targets(&formatters)?;
    tracing::info!(
      targets = targets.len(),
      locales = catalog.provided_locales().len(),
      "targets registered"
    );
    Ok(Self::new(
      config.guard_config(),
      targets,
      TitlePipeline::new(catalog, formatters),
      config.auth_config(),
      config.session_limits(),
    ))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the host.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .route("/sessions", post(sessions::create))
    .route("/sessions/{id}", delete(sessions::destroy))
    .route("/sessions/{id}/login", post(sessions::login))
    .route("/sessions/{id}/logout", post(sessions::logout))
    .route("/navigate/{target}", get(navigate::handler))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
