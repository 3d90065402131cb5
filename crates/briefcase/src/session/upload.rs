//! Upload submitter

use log::{error, info};
use std::path::PathBuf;

use crate::api::{DocumentApi, UploadRequest};
use crate::error::ApiError;
use crate::models::UploadReceipt;

/// Inline error when the server gives no detail
pub const UPLOAD_FALLBACK_MESSAGE: &str = "Error uploading document";
/// Inline error when the request never completed
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error";

/// What the user filled in to share a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub file: PathBuf,
    pub recipient_id: u64,
    /// Blank or zero means unlimited
    pub view_limit: Option<u32>,
    /// Blank or zero means never expires
    pub expires_in_days: Option<u32>,
}

/// Outcome shown in the upload form's message slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Uploaded(UploadReceipt),
    /// Text for the dedicated inline error region
    Rejected(String),
}

impl UploadResult {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, Self::Uploaded(_))
    }
}

pub(crate) fn submit(api: &dyn DocumentApi, form: &UploadForm) -> UploadResult {
    let content = match std::fs::read(&form.file) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read {}: {}", form.file.display(), e);
            return UploadResult::Rejected(format!("Could not read {}: {}", form.file.display(), e));
        }
    };
    let filename = form
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let request = UploadRequest {
        filename,
        content,
        recipient_id: form.recipient_id,
        view_limit: form.view_limit.filter(|v| *v > 0),
        expires_in_days: form.expires_in_days.filter(|d| *d > 0),
    };

    match api.upload(&request) {
        Ok(receipt) => {
            info!("Uploaded {} to recipient {}", request.filename, request.recipient_id);
            UploadResult::Uploaded(receipt)
        }
        Err(e) => {
            error!("Upload of {} failed: {}", request.filename, e);
            UploadResult::Rejected(inline_error(&e))
        }
    }
}

fn inline_error(err: &ApiError) -> String {
    if err.is_network() {
        CONNECTION_ERROR_MESSAGE.to_string()
    } else {
        err.user_message(UPLOAD_FALLBACK_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_error_text() {
        assert_eq!(inline_error(&ApiError::Network("timed out".into())), "Connection error");
        assert_eq!(
            inline_error(&ApiError::Rejected { status: 404, detail: Some("Recipient not found".into()) }),
            "Recipient not found"
        );
        assert_eq!(
            inline_error(&ApiError::Rejected { status: 500, detail: None }),
            "Error uploading document"
        );
    }
}
