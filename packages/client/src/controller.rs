//! # NoteListController — live note list for the signed-in user
//!
//! ```text
//!            bind(A)                    bind(B)
//! Unbound ───────────▶ Bound(A, e1) ───────────▶ Bound(B, e2)
//!    ▲                      │         (unbind, then subscribe)
//!    └──────── unbind ──────┘
//! ```
//!
//! Each snapshot replaces the collection wholesale. A snapshot is applied only
//! when it carries the epoch of the current binding; anything else is a stale
//! delivery and is dropped. Unbinding moves the handle out, so a torn-down query
//! can never match the current epoch. Notes whose
//! owner differs from the bound owner are filtered out even from a current
//! snapshot.
//!
//! Submitting never inserts into the collection: a new note shows up with the
//! next snapshot the store pushes after acknowledging the write.

use std::mem;

use store::{normalize_note_text, Note, NoteRepository, StoreError, SubscriptionHandle};

use crate::events::{ClientEvent, Epoch, EventSender};

enum Binding {
    Unbound,
    Bound {
        owner_id: String,
        epoch: Epoch,
        handle: SubscriptionHandle,
    },
}

/// Result of handing a snapshot to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Applied { kept: usize, dropped_foreign: usize },
    Stale,
}

pub struct NoteListController<R> {
    repo: R,
    events: EventSender,
    binding: Binding,
    collection: Vec<Note>,
    last_epoch: Epoch,
}

impl<R: NoteRepository> NoteListController<R> {
    pub fn new(repo: R, events: EventSender) -> Self {
        Self {
            repo,
            events,
            binding: Binding::Unbound,
            collection: Vec::new(),
            last_epoch: 0,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.collection
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn bound_owner(&self) -> Option<&str> {
        match &self.binding {
            Binding::Bound { owner_id, .. } => Some(owner_id),
            Binding::Unbound => None,
        }
    }

    pub fn current_epoch(&self) -> Option<Epoch> {
        match &self.binding {
            Binding::Bound { epoch, .. } => Some(*epoch),
            Binding::Unbound => None,
        }
    }

    /// Subscribe to `owner_id`'s notes, tearing down any previous binding first.
    pub fn bind(&mut self, owner_id: &str) {
        self.unbind();

        self.last_epoch += 1;
        let epoch = self.last_epoch;
        let events = self.events.clone();
        let handle = self.repo.subscribe(
            owner_id,
            Box::new(move |notes| {
                if events.send(ClientEvent::Snapshot { epoch, notes }).is_err() {
                    tracing::trace!(epoch, "event queue closed, snapshot discarded");
                }
            }),
        );

        tracing::info!(owner_id, epoch, subscription = %handle.id(), "note list bound");
        self.binding = Binding::Bound {
            owner_id: owner_id.to_string(),
            epoch,
            handle,
        };
    }

    /// Drop the live query and empty the collection. Returns whether a binding existed.
    pub fn unbind(&mut self) -> bool {
        self.collection.clear();
        match mem::replace(&mut self.binding, Binding::Unbound) {
            Binding::Bound {
                owner_id,
                epoch,
                handle,
            } => {
                handle.unsubscribe();
                tracing::info!(owner_id = %owner_id, epoch, "note list unbound");
                true
            }
            Binding::Unbound => false,
        }
    }

    pub fn apply_snapshot(&mut self, epoch: Epoch, mut notes: Vec<Note>) -> SnapshotOutcome {
        match &self.binding {
            Binding::Bound {
                owner_id,
                epoch: current,
                ..
            } if *current == epoch => {
                let delivered = notes.len();
                notes.retain(|n| n.owner_id == *owner_id);
                let dropped_foreign = delivered - notes.len();
                if dropped_foreign > 0 {
                    tracing::warn!(owner_id = %owner_id, epoch, dropped_foreign, "snapshot contained notes of another owner");
                }
                let kept = notes.len();
                self.collection = notes;
                tracing::debug!(epoch, count = kept, "snapshot applied");
                SnapshotOutcome::Applied {
                    kept,
                    dropped_foreign,
                }
            }
            _ => {
                tracing::debug!(epoch, current = ?self.current_epoch(), "stale snapshot ignored");
                SnapshotOutcome::Stale
            }
        }
    }

    /// Write a note for `owner_id`. Blank text is a no-op and never reaches the store.
    pub async fn submit(&self, owner_id: &str, text: &str) -> Result<Option<Note>, StoreError> {
        if normalize_note_text(text).is_none() {
            tracing::debug!("ignoring blank note");
            return Ok(None);
        }
        self.repo.create(owner_id, text).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{channel, EventReceiver};
    use store::MemoryNoteStore;

    fn note(id: &str, owner: &str) -> Note {
        Note {
            id: id.to_string(),
            text: format!("text of {id}"),
            owner_id: owner.to_string(),
            created_at: None,
        }
    }

    fn drain(controller: &mut NoteListController<MemoryNoteStore>, rx: &mut EventReceiver) {
        while let Ok(event) = rx.try_recv() {
            if let ClientEvent::Snapshot { epoch, notes } = event {
                controller.apply_snapshot(epoch, notes);
            }
        }
    }

    #[tokio::test]
    async fn test_bind_receives_snapshots() {
        let store = MemoryNoteStore::new();
        store.create("u1", "existing").await.unwrap();

        let (tx, mut rx) = channel();
        let mut controller = NoteListController::new(store.clone(), tx);
        controller.bind("u1");
        assert_eq!(controller.bound_owner(), Some("u1"));
        assert!(controller.notes().is_empty());

        drain(&mut controller, &mut rx);
        assert_eq!(controller.notes().len(), 1);

        controller.submit("u1", "fresh").await.unwrap();
        drain(&mut controller, &mut rx);
        let texts: Vec<_> = controller.notes().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["existing", "fresh"]);
    }

    #[tokio::test]
    async fn test_unbind_clears_and_unsubscribes() {
        let store = MemoryNoteStore::new();
        let (tx, mut rx) = channel();
        let mut controller = NoteListController::new(store.clone(), tx);

        controller.bind("u1");
        controller.submit("u1", "hello").await.unwrap();
        drain(&mut controller, &mut rx);
        assert_eq!(controller.notes().len(), 1);

        assert!(controller.unbind());
        assert!(!controller.unbind());
        assert!(controller.notes().is_empty());
        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(controller.current_epoch(), None);
    }

    #[tokio::test]
    async fn test_rebind_gets_new_epoch_and_drops_old_feed() {
        let store = MemoryNoteStore::new();
        let (tx, _rx) = channel();
        let mut controller = NoteListController::new(store.clone(), tx);

        controller.bind("u1");
        let first = controller.current_epoch().unwrap();
        controller.bind("u1");
        let second = controller.current_epoch().unwrap();

        assert_ne!(first, second);
        assert_eq!(store.subscriber_count(), 1);
        assert_eq!(
            controller.apply_snapshot(first, vec![note("n1", "u1")]),
            SnapshotOutcome::Stale
        );
        assert!(controller.notes().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_notes_are_filtered() {
        let (tx, _rx) = channel();
        let mut controller = NoteListController::new(MemoryNoteStore::new(), tx);
        controller.bind("u1");
        let epoch = controller.current_epoch().unwrap();

        let outcome =
            controller.apply_snapshot(epoch, vec![note("n1", "u1"), note("n2", "u2"), note("n3", "u1")]);
        assert_eq!(
            outcome,
            SnapshotOutcome::Applied {
                kept: 2,
                dropped_foreign: 1
            }
        );
        let ids: Vec<_> = controller.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n3"]);
    }

    #[tokio::test]
    async fn test_snapshot_while_unbound_is_stale() {
        let (tx, _rx) = channel();
        let mut controller = NoteListController::new(MemoryNoteStore::new(), tx);
        assert_eq!(
            controller.apply_snapshot(1, vec![note("n1", "u1")]),
            SnapshotOutcome::Stale
        );
        assert!(controller.notes().is_empty());
    }

    #[tokio::test]
    async fn test_blank_submit_never_reaches_store() {
        let store = MemoryNoteStore::new();
        let (tx, _rx) = channel();
        let controller = NoteListController::new(store.clone(), tx);

        assert_eq!(controller.submit("u1", "   ").await, Ok(None));
        assert_eq!(controller.submit("u1", "").await, Ok(None));
        assert_eq!(store.document_count(), 0);
    }
}
