//! Briefcase crate - Client logic for the document-sharing dashboard
//!
//! This crate provides platform-independent client functionality including:
//! - Domain models (Document, DocumentLists, User, Recipient)
//! - Document API client over JSON/HTTP
//! - Access-state classification (active / near limit / limit reached / expired)
//! - Download coordination with a per-document in-flight guard
//! - The document registry and its render model
//! - Refresh scheduling driven by named dashboard events
//!
//! This crate has zero UI dependencies. HTTP is synchronous so callers can
//! drive it from any executor.

pub mod api;
pub mod download;
pub mod error;
pub mod models;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod status;

pub use api::{DocumentApi, HttpDocumentApi, UploadRequest};
pub use download::{ActionLock, DownloadCoordinator, DownloadDir, DownloadError, DownloadOutcome, SaveTarget};
pub use error::ApiError;
pub use models::{Document, DocumentId, DocumentLists, Recipient, UploadReceipt, User};
pub use registry::{Badge, BadgeTone, DashboardView, DocumentCard, DocumentRegistry, ListKind, ListView, Renderer};
pub use scheduler::{DashboardEvent, RefreshAction, RefreshScheduler, SettledKind};
pub use session::{Dashboard, GateDecision, SessionStart, UploadForm, UploadResult};
pub use settings::ClientSettings;
pub use status::{AccessState, classify, is_download_eligible};
