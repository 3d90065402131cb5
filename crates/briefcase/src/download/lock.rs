//! Transient per-document lock for the download control
//!
//! This is a presentation concern, separate from the
//! coordinator's in-flight set: the lock expires after a fixed duration
//! whether or not the request has finished. A request that outlives the
//! lock is still protected by the in-flight set, which answers `Skipped`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::models::DocumentId;

/// Default time the control stays disabled after a click
pub const DEFAULT_LOCK_DURATION: Duration = Duration::from_secs(2);

pub struct ActionLock {
    duration: Duration,
    locked_until: Mutex<HashMap<DocumentId, Instant>>,
}

impl ActionLock {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            locked_until: Mutex::new(HashMap::new()),
        }
    }

    /// Disable the control for `id` if it is currently enabled
    ///
    /// Returns `false` when the control is still disabled from an earlier click.
    pub fn try_engage(&self, id: &DocumentId) -> bool {
        self.try_engage_at(id, Instant::now())
    }

    pub fn try_engage_at(&self, id: &DocumentId, now: Instant) -> bool {
        let mut locked = self.locked_until.lock().unwrap_or_else(|e| e.into_inner());
        locked.retain(|_, until| *until > now);
        if locked.contains_key(id) {
            return false;
        }
        locked.insert(id.clone(), now + self.duration);
        true
    }
}

impl Default for ActionLock {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_DURATION)
    }
}
