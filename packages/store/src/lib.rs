pub mod config;
pub mod error;
pub mod models;
pub mod repo;
pub mod subscription;

mod memory;
pub use memory::MemoryNoteStore;

pub use config::ClientConfig;
pub use error::StoreError;
pub use models::{normalize_note_text, Note};
pub use repo::{NoteRepository, SnapshotListener};
pub use subscription::{SubscriptionHandle, SubscriptionId};
