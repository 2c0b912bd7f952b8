//! Per-attempt navigation authorization.
//!
//! The guard looks at a target's restriction flag and the session's subject
//! and answers with a [`Decision`]. It keeps no state between attempts; the
//! only state it consults lives in the [`SessionSubjectStore`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
  session::{SessionId, SessionSubjectStore},
  target::{NavigationTarget, TargetId},
};

/// Outcome of a single navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
  Allow,
  /// Replace the in-flight target with the login target.
  ForwardToLogin(TargetId),
  /// Replace the in-flight target with the default target.
  ForwardToDefault(TargetId),
}

impl Decision {
  /// The replacement target, if this decision forwards.
  pub fn forward_target(&self) -> Option<&TargetId> {
    match self {
      Self::Allow => None,
      Self::ForwardToLogin(t) | Self::ForwardToDefault(t) => Some(t),
    }
  }

  pub fn is_allow(&self) -> bool { matches!(self, Self::Allow) }
}

/// The login and default target identities of the integrating application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
  pub login_target:   TargetId,
  /// Where an authenticated subject lands when it hits the login target.
  pub default_target: TargetId,
}

/// Observation points invoked by the guard. All methods default to no-ops.
pub trait GuardHooks<S>: Send + Sync {
  /// The target carries no restriction.
  fn not_restricted(&self, target: &NavigationTarget) { let _ = target; }

  /// A subject is present and the target is not the login target.
  fn already_authenticated(&self, target: &NavigationTarget, subject: &S) {
    let _ = (target, subject);
  }
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<S> GuardHooks<S> for NoHooks {}

impl<S, H: GuardHooks<S>> GuardHooks<S> for Arc<H> {
  fn not_restricted(&self, target: &NavigationTarget) {
    (**self).not_restricted(target)
  }

  fn already_authenticated(&self, target: &NavigationTarget, subject: &S) {
    (**self).already_authenticated(target, subject)
  }
}

/// Authorization guard over a session store.
pub struct NavigationGuard<St, H = NoHooks> {
  store:  Arc<St>,
  config: GuardConfig,
  hooks:  H,
}

impl<St: SessionSubjectStore> NavigationGuard<St, NoHooks> {
  pub fn new(store: Arc<St>, config: GuardConfig) -> Self {
    Self { store, config, hooks: NoHooks }
  }
}

impl<St, H> NavigationGuard<St, H>
where
  St: SessionSubjectStore,
  H: GuardHooks<St::Subject>,
{
  pub fn with_hooks<H2>(self, hooks: H2) -> NavigationGuard<St, H2>
  where
    H2: GuardHooks<St::Subject>,
  {
    NavigationGuard { store: self.store, config: self.config, hooks }
  }

  pub fn config(&self) -> &GuardConfig { &self.config }

  pub fn store(&self) -> &Arc<St> { &self.store }

  /// Decide whether `session` may enter `target`.
  ///
  /// | restricted | subject | login target | decision         |
  /// |------------|---------|--------------|------------------|
  /// | no         | –       | –            | Allow            |
  /// | yes        | yes     | yes          | ForwardToDefault |
  /// | yes        | yes     | no           | Allow            |
  /// | yes        | no      | yes          | Allow            |
  /// | yes        | no      | no           | ForwardToLogin   |
  pub fn check(
    &self,
    target: &NavigationTarget,
    session: &SessionId,
  ) -> Decision {
    if !target.restricted {
      tracing::debug!(target = %target.id, "not a restricted target");
      self.hooks.not_restricted(target);
      return Decision::Allow;
    }

    let is_login = target.id == self.config.login_target;
    match self.store.get(session) {
      Some(subject) => {
        tracing::info!(%session, target = %target.id, "subject already logged in");
        if is_login {
          tracing::info!(
            default = %self.config.default_target,
            "forwarding from login target to default"
          );
          Decision::ForwardToDefault(self.config.default_target.clone())
        } else {
          self.hooks.already_authenticated(target, &subject);
          Decision::Allow
        }
      }
      None => {
        tracing::info!(%session, target = %target.id, "login required");
        if is_login {
          tracing::info!("on login target, starting login process");
          Decision::Allow
        } else {
          tracing::info!(
            login = %self.config.login_target,
            "forwarding to login target"
          );
          Decision::ForwardToLogin(self.config.login_target.clone())
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{collections::HashMap, sync::Mutex};

  use super::*;
  use crate::Result;

  // A minimal store where every session is implicitly open.
  #[derive(Default)]
  struct MapStore(Mutex<HashMap<SessionId, String>>);

  impl SessionSubjectStore for MapStore {
    type Subject = String;

    fn get(&self, session: &SessionId) -> Option<String> {
      self.0.lock().unwrap().get(session).cloned()
    }

    fn set(&self, session: &SessionId, subject: String) -> Result<()> {
      self.0.lock().unwrap().insert(*session, subject);
      Ok(())
    }

    fn clear(&self, session: &SessionId) { self.0.lock().unwrap().remove(session); }
  }

  #[derive(Default)]
  struct RecordingHooks(Mutex<Vec<String>>);

  impl GuardHooks<String> for RecordingHooks {
    fn not_restricted(&self, target: &NavigationTarget) {
      self.0.lock().unwrap().push(format!("open:{}", target.id));
    }

    fn already_authenticated(&self, target: &NavigationTarget, subject: &String) {
      self.0.lock().unwrap().push(format!("authed:{}:{subject}", target.id));
    }
  }

  fn config() -> GuardConfig {
    GuardConfig {
      login_target:   "login".into(),
      default_target: "dashboard".into(),
    }
  }

  fn guard() -> NavigationGuard<MapStore> {
    NavigationGuard::new(Arc::new(MapStore::default()), config())
  }

  fn login() -> NavigationTarget { NavigationTarget::restricted("login") }

  fn dashboard() -> NavigationTarget { NavigationTarget::restricted("dashboard") }

  #[test]
  fn unrestricted_target_is_allowed_and_hook_fires() {
    let hooks = Arc::new(RecordingHooks::default());
    let g = guard().with_hooks(Arc::clone(&hooks));
    let d = g.check(&NavigationTarget::open("about"), &SessionId::new());
    assert_eq!(d, Decision::Allow);
    assert_eq!(*hooks.0.lock().unwrap(), vec!["open:about".to_string()]);
  }

  #[test]
  fn anonymous_session_is_forwarded_to_login() {
    let d = guard().check(&dashboard(), &SessionId::new());
    assert_eq!(d, Decision::ForwardToLogin("login".into()));
  }

  #[test]
  fn anonymous_session_may_enter_login() {
    assert_eq!(guard().check(&login(), &SessionId::new()), Decision::Allow);
  }

  #[test]
  fn authenticated_session_is_allowed_and_hook_fires() {
    let hooks = Arc::new(RecordingHooks::default());
    let g = guard().with_hooks(Arc::clone(&hooks));
    let s = SessionId::new();
    g.store().set(&s, "alice".into()).unwrap();

    assert_eq!(g.check(&dashboard(), &s), Decision::Allow);
    assert_eq!(*hooks.0.lock().unwrap(), vec![
      "authed:dashboard:alice".to_string()
    ]);
  }

  #[test]
  fn authenticated_session_on_login_is_forwarded_to_default_without_loop() {
    let g = guard();
    let s = SessionId::new();
    g.store().set(&s, "alice".into()).unwrap();

    let first = g.check(&login(), &s);
    assert_eq!(first, Decision::ForwardToDefault("dashboard".into()));

    // Re-entering the default target must not bounce back to login.
    assert_eq!(g.check(&dashboard(), &s), Decision::Allow);
  }

  #[test]
  fn clearing_the_subject_restores_forwarding() {
    let g = guard();
    let s = SessionId::new();
    g.store().set(&s, "alice".into()).unwrap();
    g.store().clear(&s);
    assert_eq!(g.check(&dashboard(), &s), Decision::ForwardToLogin("login".into()));
  }

  #[test]
  fn sessions_do_not_share_subjects() {
    let g = guard();
    let alice = SessionId::new();
    g.store().set(&alice, "alice".into()).unwrap();
    assert_eq!(g.check(&dashboard(), &alice), Decision::Allow);
    assert!(!g.check(&dashboard(), &SessionId::new()).is_allow());
  }

  #[test]
  fn forward_target_exposes_replacement() {
    assert_eq!(Decision::Allow.forward_target(), None);
    assert_eq!(
      Decision::ForwardToLogin("login".into()).forward_target(),
      Some(&TargetId::from("login"))
    );
  }
}
