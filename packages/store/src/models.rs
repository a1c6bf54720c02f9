//! # Note model
//!
//! [`Note`] is the client's read-only projection of a document in the notes
//! collection. Field names on the wire follow the document shape (`userId`,
//! `createdAt`) so a snapshot can be deserialized straight from a store payload.
//!
//! `created_at` is assigned by the store when it acknowledges the write. A
//! freshly created note therefore carries `None` until the next snapshot arrives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single note owned by one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Opaque document id assigned by the store.
    pub id: String,
    /// Body text as submitted.
    pub text: String,
    /// `user_id` of the identity that created the note.
    #[serde(rename = "userId")]
    pub owner_id: String,
    /// Server timestamp, `None` until acknowledged.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Whether the store has assigned a server timestamp.
    pub fn is_acknowledged(&self) -> bool {
        self.created_at.is_some()
    }

    /// Human-readable creation time for list rendering.
    pub fn created_at_label(&self) -> String {
        match self.created_at {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "pending".to_string(),
        }
    }
}

/// Returns the trimmed text if anything is left, `None` for blank input.
pub fn normalize_note_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_note_text() {
        assert_eq!(normalize_note_text("  hello "), Some("hello"));
        assert_eq!(normalize_note_text(""), None);
        assert_eq!(normalize_note_text(" \t\n "), None);
    }

    #[test]
    fn test_created_at_label() {
        let mut note = Note {
            id: "n1".to_string(),
            text: "hello".to_string(),
            owner_id: "u1".to_string(),
            created_at: None,
        };
        assert!(!note.is_acknowledged());
        assert_eq!(note.created_at_label(), "pending");

        note.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap());
        assert!(note.is_acknowledged());
        assert_eq!(note.created_at_label(), "2024-03-01 09:30:05");
    }

    #[test]
    fn test_document_field_names() {
        let json = r#"{"id":"n1","text":"hello","userId":"u1"}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.owner_id, "u1");
        assert!(note.created_at.is_none());

        let out = serde_json::to_string(&note).unwrap();
        assert!(out.contains("\"userId\":\"u1\""));
        assert!(out.contains("\"createdAt\":null"));
    }
}
