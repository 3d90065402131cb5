//! Document server API
//!
//! This module provides:
//! - The `DocumentApi` trait, the seam between client logic and the server
//! - An HTTP implementation of it over JSON
//! - Wire types for request and response bodies

mod client;

pub use client::HttpDocumentApi;

use crate::error::ApiError;
use crate::models::{DocumentId, DocumentLists, Recipient, UploadReceipt, User};

/// A file to share with a recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub filename: String,
    pub content: Vec<u8>,
    pub recipient_id: u64,
    /// Only sent when positive
    pub view_limit: Option<u32>,
    /// Only sent when positive
    pub expires_in_days: Option<u32>,
}

/// Operations offered by the document server
///
/// Implementations must be usable from several threads at once: downloads
/// of different documents run concurrently with each other and with
/// refreshes.
pub trait DocumentApi: Send + Sync {
    /// Exchange credentials for a session (`POST /api/login`)
    fn login(&self, email: &str, password: &str) -> Result<User, ApiError>;

    /// Validate the current session (`GET /api/me`)
    fn me(&self) -> Result<User, ApiError>;

    /// List users that can receive documents (`GET /api/users`)
    fn users(&self) -> Result<Vec<Recipient>, ApiError>;

    /// Share a file (`POST /api/documents/upload`, multipart)
    fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt, ApiError>;

    /// Fetch the sent and received document lists (`GET /api/documents`)
    fn documents(&self) -> Result<DocumentLists, ApiError>;

    /// Fetch a document's content (`GET /api/documents/{id}/download`)
    ///
    /// Each successful call counts as a view on the server.
    fn download(&self, id: &DocumentId) -> Result<Vec<u8>, ApiError>;

    /// End the session (`POST /api/logout`)
    fn logout(&self) -> Result<(), ApiError>;
}

/// Wire types for the document API
pub mod wire {
    use serde::{Deserialize, Serialize};

    use crate::models::User;

    /// Body of `POST /api/login`
    #[derive(Debug, Serialize)]
    pub struct LoginRequest<'a> {
        pub email: &'a str,
        pub password: &'a str,
    }

    /// Response of `POST /api/login`
    #[derive(Debug, Deserialize)]
    pub struct LoginResponse {
        pub access_token: String,
        #[serde(default)]
        pub token_type: Option<String>,
        pub user: User,
    }

    /// Error body of any non-2xx response
    ///
    /// `detail` is usually a string but validation failures carry a list.
    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        #[serde(default)]
        pub detail: Option<serde_json::Value>,
    }

    impl ErrorBody {
        pub fn into_detail(self) -> Option<String> {
            match self.detail? {
                serde_json::Value::String(s) if !s.is_empty() => Some(s),
                serde_json::Value::String(_) | serde_json::Value::Null => None,
                other => Some(other.to_string()),
            }
        }
    }
}
