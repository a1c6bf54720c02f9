//! # SessionStore: who is signed in
//!
//! Holds at most one [`Identity`]. Only the app's session-change handler mutates
//! it, and every mutation reports a [`SessionTransition`] so the caller can tear
//! down or establish the note subscription that belongs to the session.
//!
//! Re-notification of the same `user_id` (for example a token refresh) is
//! [`SessionTransition::Unchanged`]: the email is refreshed in place and the
//! live note query is kept.

use api::Identity;

/// What changed when a new session value was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTransition {
    Unchanged,
    Started(Identity),
    Switched { from: Identity, to: Identity },
    Ended(Identity),
}

#[derive(Debug, Default)]
pub struct SessionStore {
    current: Option<Identity>,
    generation: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Bumped on every identity change. Async completions compare it against the
    /// value captured when they started.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn apply(&mut self, next: Option<Identity>) -> SessionTransition {
        match (self.current.take(), next) {
            (None, None) => SessionTransition::Unchanged,
            (None, Some(to)) => {
                self.current = Some(to.clone());
                self.generation += 1;
                SessionTransition::Started(to)
            }
            (Some(from), None) => {
                self.generation += 1;
                SessionTransition::Ended(from)
            }
            (Some(from), Some(to)) if from.user_id == to.user_id => {
                self.current = Some(to);
                SessionTransition::Unchanged
            }
            (Some(from), Some(to)) => {
                self.current = Some(to.clone());
                self.generation += 1;
                SessionTransition::Switched { from, to }
            }
        }
    }
}
