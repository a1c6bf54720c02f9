//! Client-side session and note synchronisation.
//!
//! [`NotesApp`] is the entry point: construct it with an [`api::AuthGateway`] and
//! a [`store::NoteRepository`], forward user intents to it, and render
//! [`NotesApp::session`], [`NotesApp::notes`] and [`NotesApp::last_error`].

pub mod activity_log;
pub mod controller;
pub mod events;
pub mod session;

mod app;
mod error;

pub use activity_log::{ActivityLog, LogEntry, LogLevel};
pub use app::NotesApp;
pub use controller::{NoteListController, SnapshotOutcome};
pub use error::UiError;
pub use events::{ClientEvent, Epoch};
pub use session::{SessionStore, SessionTransition};
