//! Document download coordination
//!
//! Provides the coordinator that guarantees at most one outstanding request
//! per document, the save target that stores fetched content, and the
//! short-lived action lock the UI applies to its download control.

mod coordinator;
mod lock;
mod save;

pub use coordinator::{DownloadCoordinator, DownloadError, DownloadOutcome};
pub use lock::ActionLock;
pub use save::{DownloadDir, SaveTarget};
