//! Download coordinator
//!
//! Enforces at most one outstanding download request per document id.
//! Downloads of different documents proceed concurrently.

use log::{error, info};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::SaveTarget;
use crate::api::DocumentApi;
use crate::error::ApiError;
use crate::models::DocumentId;

/// Generic alert text when the server gives no detail
pub const DOWNLOAD_FALLBACK_MESSAGE: &str = "Error downloading document";

/// Why a download did not produce a saved file
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to save {filename}: {source}")]
    Save {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// The document is gone server-side; the cached view is stale
    pub fn is_gone(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_gone())
    }

    /// Alert text for the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(DOWNLOAD_FALLBACK_MESSAGE),
            Self::Save { .. } => DOWNLOAD_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Result of a single `request_download` call
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Content fetched and handed to the save target
    Success { saved_to: PathBuf },
    /// A request for this document was already outstanding; nothing was sent
    Skipped,
    /// The request (or saving its content) failed
    Failed(DownloadError),
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn is_gone(&self) -> bool {
        matches!(self, Self::Failed(e) if e.is_gone())
    }
}

/// Coordinates document downloads
///
/// The in-flight set is owned by this instance; construct one per session.
pub struct DownloadCoordinator {
    api: Arc<dyn DocumentApi>,
    target: Arc<dyn SaveTarget>,
    in_flight: Mutex<HashSet<DocumentId>>,
}

/// Membership of one id in the in-flight set
///
/// Dropping the guard removes the id, so removal happens on every exit
/// path, unwinding included.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<DocumentId>>,
    id: DocumentId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.set.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.id);
    }
}

impl DownloadCoordinator {
    pub fn new(api: Arc<dyn DocumentApi>, target: Arc<dyn SaveTarget>) -> Self {
        Self {
            api,
            target,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Download a document and save it as `filename`
    ///
    /// Returns `Skipped` without touching the network if a request for
    /// `id` is already outstanding. The id is removed from the in-flight
    /// set before this returns, whatever the outcome.
    pub fn request_download(&self, id: &DocumentId, filename: &str) -> DownloadOutcome {
        let Some(_guard) = self.begin(id) else {
            info!("Download already in progress for document {}", id);
            return DownloadOutcome::Skipped;
        };

        match self.fetch_and_save(id, filename) {
            Ok(saved_to) => {
                info!("Downloaded document {} to {}", id, saved_to.display());
                DownloadOutcome::Success { saved_to }
            }
            Err(e) => {
                error!("Error downloading document {}: {}", id, e);
                DownloadOutcome::Failed(e)
            }
        }
    }

    /// Whether a request for `id` is outstanding
    pub fn is_in_flight(&self, id: &DocumentId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn begin(&self, id: &DocumentId) -> Option<InFlightGuard<'_>> {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            set: &self.in_flight,
            id: id.clone(),
        })
    }

    fn fetch_and_save(&self, id: &DocumentId, filename: &str) -> Result<PathBuf, DownloadError> {
        let content = self.api.download(id)?;
        self.target
            .save(filename, &content)
            .map_err(|source| DownloadError::Save {
                filename: filename.to_string(),
                source,
            })
    }
}
