//! # Subscription handles
//!
//! Both live note queries and session listeners hand back a [`SubscriptionHandle`].
//! The handle owns a teardown closure supplied by whoever registered the
//! subscription; [`SubscriptionHandle::unsubscribe`] runs it at most once, so
//! calling it again (or dropping the handle afterwards) is a no-op.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocate a fresh id. Never repeats within a process.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Teardown = Box<dyn FnOnce() + Send>;

/// Handle to a live subscription.
pub struct SubscriptionHandle {
    id: SubscriptionId,
    teardown: Mutex<Option<Teardown>>,
}

impl SubscriptionHandle {
    pub fn new(id: SubscriptionId, teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether `unsubscribe` has not run yet.
    pub fn is_active(&self) -> bool {
        self.teardown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stop further deliveries. Returns `true` only for the call that actually
    /// tore the subscription down.
    pub fn unsubscribe(&self) -> bool {
        let teardown = self
            .teardown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match teardown {
            Some(teardown) => {
                teardown();
                tracing::debug!(subscription = %self.id, "unsubscribed");
                true
            }
            None => false,
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
