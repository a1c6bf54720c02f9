//! The single FIFO queue every external callback feeds.
//!
//! Session listeners and snapshot listeners never touch app state directly; they
//! enqueue a [`ClientEvent`] and the app drains the queue one event at a time.
//! Handling is therefore never interleaved, whatever order the two external
//! sources deliver in.

use api::Identity;
use store::Note;
use tokio::sync::mpsc;

/// Identifies one binding of the note list to a live query. A fresh epoch is
/// allocated every time the controller subscribes, so two feeds for the same
/// owner are still told apart.
pub type Epoch = u64;

#[derive(Debug, Clone)]
pub enum ClientEvent {
    SessionChanged(Option<Identity>),
    Snapshot { epoch: Epoch, notes: Vec<Note> },
}

pub type EventSender = mpsc::UnboundedSender<ClientEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ClientEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
