//! # NoteRepository — the client's view of the hosted document store
//!
//! The repository exposes exactly two operations:
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`create`](NoteRepository::create) | Writes a note scoped to an owner. The server timestamp is not known to the caller, so the returned [`Note`] has `created_at == None`. |
//! | [`subscribe`](NoteRepository::subscribe) | Opens a live query filtered on the owner. Each delivery is the complete current set of that owner's notes in store insertion order, never a delta. |
//!
//! `subscribe` does not suspend: it returns a [`SubscriptionHandle`] at once and
//! keeps invoking the listener until the handle is unsubscribed. Implementations
//! live in sibling modules ([`crate::memory`]); a hosted backend binding would
//! implement the same trait.

use std::future::Future;

use crate::error::StoreError;
use crate::models::Note;
use crate::subscription::SubscriptionHandle;

/// Receives full replacement snapshots from a live query.
pub type SnapshotListener = Box<dyn Fn(Vec<Note>) + Send + Sync>;

/// Async interface to a document store holding per-user notes.
pub trait NoteRepository {
    fn create(
        &self,
        owner_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<Note, StoreError>>;

    fn subscribe(&self, owner_id: &str, on_snapshot: SnapshotListener) -> SubscriptionHandle;
}
