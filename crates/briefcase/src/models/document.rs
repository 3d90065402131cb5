//! Document model: a read-only projection of server-side document state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::status::{self, AccessState};

/// Unique identifier for a document
///
/// Opaque to the client. The server issues integers; they are kept as
/// their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(u64),
    Str(String),
}

impl From<RawId> for DocumentId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => Self(n.to_string()),
            RawId::Str(s) => Self(s),
        }
    }
}

/// A shared document as last reported by the server
///
/// `is_expired` and `is_limit_reached` are authoritative and computed by
/// the server at fetch time. The client never recomputes them from
/// `expires_at` / `view_limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    #[serde(default)]
    pub sender_id: Option<u64>,
    pub sender_username: String,
    #[serde(default)]
    pub recipient_id: Option<u64>,
    pub recipient_username: String,
    #[serde(default)]
    pub view_count: u32,
    /// Absent means unlimited
    #[serde(default)]
    pub view_limit: Option<u32>,
    /// Absent means never expires
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::deserialize_flag")]
    pub is_expired: bool,
    #[serde(default, deserialize_with = "timestamp::deserialize_flag")]
    pub is_limit_reached: bool,
}

impl Document {
    /// Derived access state; recomputed on every call, never cached
    pub fn access_state(&self) -> AccessState {
        status::classify(self.is_expired, self.is_limit_reached, self.view_count, self.view_limit)
    }

    /// Whether the download action is offered for this document
    pub fn is_download_eligible(&self) -> bool {
        status::is_download_eligible(self.is_expired, self.is_limit_reached)
    }
}

/// Response of `GET /api/documents`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLists {
    #[serde(default)]
    pub sent: Vec<Document>,
    #[serde(default)]
    pub received: Vec<Document>,
}

impl DocumentLists {
    /// Find a document by id in either list
    pub fn find(&self, id: &DocumentId) -> Option<&Document> {
        self.sent.iter().chain(self.received.iter()).find(|d| &d.id == id)
    }
}
