//! Errors raised by [`crate::NoteRepository`] implementations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The note text was empty after trimming. Raised before any remote call.
    #[error("Note text must not be empty")]
    EmptyText,

    /// The backing store refused the write.
    #[error("Write rejected: {0}")]
    WriteRejected(String),
}
