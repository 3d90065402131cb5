//! Error types for the document API

use thiserror::Error;

/// Failure talking to the document server
///
/// `Gone` is the download-specific rejection (HTTP 410): the document is no
/// longer accessible, so any cached view of it is stale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request could not be completed (connection, timeout, I/O)
    #[error("Network failure: {0}")]
    Network(String),

    /// The session is missing or no longer valid (HTTP 401)
    #[error("Not authenticated: {}", detail.as_deref().unwrap_or("session rejected"))]
    Unauthorized { detail: Option<String> },

    /// The document no longer exists or is no longer accessible (HTTP 410)
    #[error("Gone: {}", detail.as_deref().unwrap_or("document no longer available"))]
    Gone { detail: Option<String> },

    /// Any other non-2xx response
    #[error("Server rejected request ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    /// A 2xx response whose body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-2xx status and optional `detail` to an error
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            401 => Self::Unauthorized { detail },
            410 => Self::Gone { detail },
            _ => Self::Rejected { status, detail },
        }
    }

    pub fn is_gone(&self) -> bool {
        matches!(self, Self::Gone { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Server-provided detail message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Gone { detail } | Self::Rejected { detail, .. } => {
                detail.as_deref()
            }
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Text to show the user: the server's detail verbatim, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => Self::from_status(status, None),
            ureq::Error::Json(e) => Self::Decode(e.to_string()),
            other => Self::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(ApiError::from_status(410, None).is_gone());
        assert_eq!(
            ApiError::from_status(401, None),
            ApiError::Unauthorized { detail: None }
        );
        assert_eq!(
            ApiError::from_status(403, Some("nope".into())),
            ApiError::Rejected { status: 403, detail: Some("nope".into()) }
        );
    }

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ApiError::Gone { detail: Some("The document reached the view limit".into()) };
        assert_eq!(err.user_message("Error downloading document"), "The document reached the view limit");

        let err = ApiError::Rejected { status: 500, detail: None };
        assert_eq!(err.user_message("Error downloading document"), "Error downloading document");

        let err = ApiError::Network("connection refused".into());
        assert_eq!(err.user_message("Connection error"), "Connection error");
    }
}
