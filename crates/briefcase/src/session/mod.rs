//! Dashboard session
//!
//! `Dashboard` is the single per-session object that owns the registry,
//! the download coordinator and the scheduler. Front ends hold one instance
//! and feed it events; nothing here is module-level state.
//!
//! Also provides the thin glue around the core: the session gate, the
//! recipient directory and the upload submitter.

mod directory;
mod gate;
mod upload;

pub use directory::load_recipients;
pub use gate::{GateDecision, verify_session};
pub use upload::{CONNECTION_ERROR_MESSAGE, UPLOAD_FALLBACK_MESSAGE, UploadForm, UploadResult};

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::api::DocumentApi;
use crate::download::{DownloadCoordinator, DownloadOutcome, SaveTarget};
use crate::models::{DocumentId, Recipient, User};
use crate::registry::{DocumentRegistry, Renderer};
use crate::scheduler::{DashboardEvent, RefreshAction, RefreshScheduler, SettledKind};

/// What the dashboard needs once the session gate lets the user in
#[derive(Debug, Clone)]
pub struct SessionStart {
    pub user: User,
    pub recipients: Vec<Recipient>,
}

pub struct Dashboard {
    api: Arc<dyn DocumentApi>,
    registry: Arc<DocumentRegistry>,
    coordinator: DownloadCoordinator,
    scheduler: RefreshScheduler,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn DocumentApi>,
        target: Arc<dyn SaveTarget>,
        renderer: Option<Arc<dyn Renderer>>,
        scheduler: RefreshScheduler,
    ) -> Self {
        let mut registry = DocumentRegistry::new(Arc::clone(&api));
        if let Some(renderer) = renderer {
            registry = registry.with_renderer(renderer);
        }
        Self {
            coordinator: DownloadCoordinator::new(Arc::clone(&api), target),
            registry: Arc::new(registry),
            api,
            scheduler,
        }
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    pub fn coordinator(&self) -> &DownloadCoordinator {
        &self.coordinator
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Validate the session, load the directory, then do the initial refresh
    ///
    /// Returns `None` when the user has to log in again.
    pub fn start(&self) -> Option<SessionStart> {
        let GateDecision::Proceed(user) = verify_session(self.api.as_ref()) else {
            return None;
        };
        let recipients = load_recipients(self.api.as_ref());
        self.dispatch(DashboardEvent::SessionVerified);
        Some(SessionStart { user, recipients })
    }

    /// Apply the scheduler's action for `event`
    ///
    /// `Now` refreshes before returning. `After` hands the refresh to a
    /// detached timer thread; several of those may be pending at once.
    pub fn dispatch(&self, event: DashboardEvent) -> RefreshAction {
        let action = self.scheduler.action_for(event);
        debug!("{:?} -> {:?}", event, action);
        match action {
            RefreshAction::Now => {
                self.registry.refresh();
            }
            RefreshAction::After(delay) => self.refresh_later(delay),
            RefreshAction::None => {}
        }
        action
    }

    /// Download a document, then schedule the refresh its outcome calls for
    pub fn download(&self, id: &DocumentId, filename: &str) -> DownloadOutcome {
        let outcome = self.coordinator.request_download(id, filename);
        self.dispatch(DashboardEvent::DownloadSettled(SettledKind::from(&outcome)));
        outcome
    }

    /// Share a file; a successful upload refreshes the lists
    pub fn submit_upload(&self, form: &UploadForm) -> UploadResult {
        let result = upload::submit(self.api.as_ref(), form);
        if result.is_uploaded() {
            self.dispatch(DashboardEvent::UploadSucceeded);
        }
        result
    }

    pub fn recipients(&self) -> Vec<Recipient> {
        load_recipients(self.api.as_ref())
    }

    pub fn logout(&self) {
        if let Err(e) = self.api.logout() {
            warn!("Logout request failed: {}", e);
        }
    }

    fn refresh_later(&self, delay: Duration) {
        let registry = Arc::clone(&self.registry);
        let spawned = std::thread::Builder::new()
            .name("deferred-refresh".into())
            .spawn(move || {
                std::thread::sleep(delay);
                registry.refresh();
            });
        if let Err(e) = spawned {
            warn!("Failed to schedule deferred refresh: {}", e);
        }
    }
}
