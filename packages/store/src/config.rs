//! # Client configuration — `notes.toml`
//!
//! Describes which hosted backend project the client talks to, where notes live
//! in the document store, and the local credential rules applied before any
//! request leaves the client.
//!
//! ## Structure
//!
//! ```toml
//! [backend]
//! project_id = "demo-project"
//! api_key = ""
//! auth_domain = "demo-project.example.com"
//!
//! [notes]
//! collection = "notes"    # document collection holding every user's notes
//! owner_field = "userId"  # field the live query filters on
//!
//! [auth]
//! min_password_len = 6
//! ```
//!
//! All structs derive `Default`, so a missing or empty file is equivalent to the
//! default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `notes.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Hosted project coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_project_id")]
    pub project_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub auth_domain: String,
}

fn default_project_id() -> String {
    "demo-project".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            api_key: String::new(),
            auth_domain: String::new(),
        }
    }
}

/// Where notes are kept in the document store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotesConfig {
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_owner_field")]
    pub owner_field: String,
}

fn default_collection() -> String {
    "notes".to_string()
}

fn default_owner_field() -> String {
    "userId".to_string()
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            owner_field: default_owner_field(),
        }
    }
}

/// Local credential rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

fn default_min_password_len() -> usize {
    6
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_len: default_min_password_len(),
        }
    }
}

impl ClientConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "notes.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check the values a client cannot work without.
    pub fn validate(&self) -> Result<(), String> {
        if self.backend.project_id.trim().is_empty() {
            return Err("backend.project_id must not be empty".to_string());
        }
        if self.notes.collection.trim().is_empty() {
            return Err("notes.collection must not be empty".to_string());
        }
        if self.notes.owner_field.trim().is_empty() {
            return Err("notes.owner_field must not be empty".to_string());
        }
        if self.auth.min_password_len == 0 {
            return Err("auth.min_password_len must be at least 1".to_string());
        }
        Ok(())
    }
}
