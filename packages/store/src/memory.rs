use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Duration, Utc};

use crate::config::ClientConfig;
use crate::error::StoreError;
use crate::models::{normalize_note_text, Note};
use crate::repo::{NoteRepository, SnapshotListener};
use crate::subscription::{SubscriptionHandle, SubscriptionId};

/// In-memory NoteRepository for testing and offline use.
///
/// Behaves like a hosted document store with live queries: every acknowledged
/// write re-pushes the full snapshot to each subscription on the same owner.
#[derive(Clone, Debug)]
pub struct MemoryNoteStore {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    collection: String,
    owner_field: String,
    documents: Vec<Note>,
    listeners: BTreeMap<SubscriptionId, LiveQuery>,
    last_timestamp: Option<DateTime<Utc>>,
    write_failure: Option<String>,
}

struct LiveQuery {
    owner_id: String,
    listener: Arc<SnapshotListener>,
}

impl std::fmt::Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inner")
            .field("collection", &self.collection)
            .field("owner_field", &self.owner_field)
            .field("documents", &self.documents.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Inner {
    fn snapshot_for(&self, owner_id: &str) -> Vec<Note> {
        self.documents
            .iter()
            .filter(|n| n.owner_id == owner_id)
            .cloned()
            .collect()
    }

    /// Strictly increasing server clock.
    fn server_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }
}

impl Default for MemoryNoteStore {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose document ids live under the configured collection and whose
    /// live queries filter on the configured owner field.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                collection: config.notes.collection.clone(),
                owner_field: config.notes.owner_field.clone(),
                documents: Vec::new(),
                listeners: BTreeMap::new(),
                last_timestamp: None,
                write_failure: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every subsequent `create` fail with [`StoreError::WriteRejected`].
    pub fn reject_writes(&self, reason: &str) {
        self.lock().write_failure = Some(reason.to_string());
    }

    /// Undo [`reject_writes`](Self::reject_writes).
    pub fn accept_writes(&self) {
        self.lock().write_failure = None;
    }

    /// Total number of stored notes across all owners.
    pub fn document_count(&self) -> usize {
        self.lock().documents.len()
    }

    /// The owner-scoped query a subscription for `owner_id` runs.
    pub fn query_description(&self, owner_id: &str) -> String {
        let inner = self.lock();
        format!("{} where {} == {owner_id}", inner.collection, inner.owner_field)
    }

    /// Number of live queries currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

impl NoteRepository for MemoryNoteStore {
    async fn create(&self, owner_id: &str, text: &str) -> Result<Note, StoreError> {
        if normalize_note_text(text).is_none() {
            return Err(StoreError::EmptyText);
        }

        let (note, snapshot, deliveries) = {
            let mut inner = self.lock();
            if let Some(reason) = &inner.write_failure {
                tracing::warn!(owner_id, %reason, "rejecting note write");
                return Err(StoreError::WriteRejected(reason.clone()));
            }

            let created_at = inner.server_timestamp();
            let id = format!("{}/{}", inner.collection, uuid::Uuid::new_v4().simple());
            let stored = Note {
                id,
                text: text.to_string(),
                owner_id: owner_id.to_string(),
                created_at: Some(created_at),
            };
            inner.documents.push(stored.clone());

            let snapshot = inner.snapshot_for(owner_id);
            let deliveries: Vec<_> = inner
                .listeners
                .values()
                .filter(|q| q.owner_id == owner_id)
                .map(|q| q.listener.clone())
                .collect();

            let note = Note {
                created_at: None,
                ..stored
            };
            (note, snapshot, deliveries)
        };

        tracing::debug!(owner_id, id = %note.id, listeners = deliveries.len(), "note created");

        // Listeners run outside the lock so they may call back into the store.
        for listener in deliveries {
            listener(snapshot.clone());
        }

        Ok(note)
    }

    fn subscribe(&self, owner_id: &str, on_snapshot: SnapshotListener) -> SubscriptionHandle {
        let id = SubscriptionId::next();
        let listener = Arc::new(on_snapshot);

        let initial = {
            let mut inner = self.lock();
            inner.listeners.insert(
                id,
                LiveQuery {
                    owner_id: owner_id.to_string(),
                    listener: listener.clone(),
                },
            );
            inner.snapshot_for(owner_id)
        };

        tracing::debug!(
            query = %self.query_description(owner_id),
            subscription = %id,
            "live query opened"
        );
        listener(initial);

        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        SubscriptionHandle::new(id, move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .listeners
                    .remove(&id);
            }
        })
    }
}
