//! `MemorySessionStore`, the in-memory `SessionSubjectStore`.

use std::{
  collections::HashMap,
  sync::Arc,
  time::{Duration, Instant},
};

use parking_lot::{Mutex, RwLock};
use waypost_core::session::{SessionId, SessionSubjectStore};

use crate::{Error, Result};

/// Bounds on how many sessions the store keeps and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
  /// Open sessions allowed at once; `open` fails beyond this.
  pub max_sessions: usize,
  /// A session untouched for longer than this is evicted on the next `open`.
  pub idle_timeout: Duration,
}

impl Default for SessionLimits {
  fn default() -> Self {
    Self {
      max_sessions: 10_000,
      idle_timeout: Duration::from_secs(30 * 60),
    }
  }
}

struct SlotState<S> {
  subject: Option<S>,
  touched: Instant,
}

type Slot<S> = Arc<Mutex<SlotState<S>>>;

/// Session slots held in process memory.
///
/// The outer map lock is held only long enough to find a slot; reads and
/// writes of the subject itself happen under that slot's own mutex. Every
/// access refreshes the slot's idle clock.
pub struct MemorySessionStore<S> {
  slots:  RwLock<HashMap<SessionId, Slot<S>>>,
  limits: SessionLimits,
}

impl<S> Default for MemorySessionStore<S> {
  fn default() -> Self { Self::with_limits(SessionLimits::default()) }
}

impl<S> MemorySessionStore<S> {
  pub fn new() -> Self { Self::default() }

  pub fn with_limits(limits: SessionLimits) -> Self {
    Self { slots: RwLock::new(HashMap::new()), limits }
  }

  /// Open a fresh, unauthenticated session.
  ///
  /// Idle sessions are evicted first. Fails with [`Error::Full`] if the store
  /// is still at capacity afterwards.
  pub fn open(&self) -> Result<SessionId> { self.open_at(Instant::now()) }

  pub(crate) fn open_at(&self, now: Instant) -> Result<SessionId> {
    let mut slots = self.slots.write();
    let before = slots.len();
    let idle_timeout = self.limits.idle_timeout;
    slots.retain(|_, slot| {
      now.saturating_duration_since(slot.lock().touched) <= idle_timeout
    });
    let evicted = before - slots.len();
    if evicted > 0 {
      tracing::debug!(evicted, "idle sessions evicted");
    }

    if slots.len() >= self.limits.max_sessions {
      tracing::warn!(limit = self.limits.max_sessions, "session store full");
      return Err(Error::Full { limit: self.limits.max_sessions });
    }

    let id = SessionId::new();
    slots.insert(
      id,
      Arc::new(Mutex::new(SlotState { subject: None, touched: now })),
    );
    tracing::debug!(session = %id, "session opened");
    Ok(id)
  }

  pub fn is_open(&self, id: &SessionId) -> bool {
    self.slots.read().contains_key(id)
  }

  /// Destroy the session and its slot. Returns `false` if it was not open.
  pub fn destroy(&self, id: &SessionId) -> bool {
    let removed = self.slots.write().remove(id).is_some();
    if removed {
      tracing::debug!(session = %id, "session destroyed");
    }
    removed
  }

  /// Number of open sessions.
  pub fn len(&self) -> usize { self.slots.read().len() }

  pub fn is_empty(&self) -> bool { self.slots.read().is_empty() }

  fn slot(&self, id: &SessionId) -> Option<Slot<S>> {
    self.slots.read().get(id).cloned()
  }
}

impl<S> SessionSubjectStore for MemorySessionStore<S>
where
  S: Clone + Send + Sync + 'static,
{
  type Subject = S;

  fn get(&self, session: &SessionId) -> Option<S> {
    let slot = self.slot(session)?;
    let mut state = slot.lock();
    state.touched = Instant::now();
    state.subject.clone()
  }

  fn set(&self, session: &SessionId, subject: S) -> waypost_core::Result<()> {
    let slot = self
      .slot(session)
      .ok_or(waypost_core::Error::UnknownSession(*session))?;
    let mut state = slot.lock();
    state.subject = Some(subject);
    state.touched = Instant::now();
    Ok(())
  }

  fn clear(&self, session: &SessionId) {
    if let Some(slot) = self.slot(session) {
      let mut state = slot.lock();
      state.subject = None;
      state.touched = Instant::now();
    }
  }
}
