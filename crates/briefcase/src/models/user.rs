//! User-facing account models

use serde::{Deserialize, Serialize};

/// The authenticated user, as reported by `GET /api/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,
    pub username: String,
    pub email: String,
}

impl User {
    /// Header text shown on the dashboard
    pub fn display(&self) -> String {
        format!("{} ({})", self.username, self.email)
    }
}

/// A user that documents can be sent to (`GET /api/users`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: u64,
    pub username: String,
    pub email: String,
}

impl Recipient {
    /// Label used in the recipient selector
    pub fn label(&self) -> String {
        format!("{} ({})", self.username, self.email)
    }
}

/// Successful upload response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
    #[serde(default)]
    pub document_id: Option<u64>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_label() {
        let r = Recipient { id: 2, username: "bob".into(), email: "bob@example.com".into() };
        assert_eq!(r.label(), "bob (bob@example.com)");
    }

    #[test]
    fn test_me_without_id() {
        let user: User = serde_json::from_str(r#"{"username":"alice","email":"a@example.com"}"#).unwrap();
        assert_eq!(user.id, None);
        assert_eq!(user.display(), "alice (a@example.com)");
    }
}
