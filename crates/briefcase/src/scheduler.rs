//! Refresh scheduling
//!
//! Pure mapping from dashboard events to refresh actions, testable without
//! timers or a UI. No trigger is debounced or coalesced against another.

use std::time::Duration;

/// Interval of the periodic refresh while the dashboard is open
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Delay before refreshing after a successful download, so server-side
/// counters have settled
pub const DOWNLOAD_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// How a download request settled, as far as scheduling is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettledKind {
    Saved,
    /// Server answered 410; the cached view is stale
    Gone,
    Failed,
    /// Duplicate request; nothing was sent
    Skipped,
}

impl From<&crate::download::DownloadOutcome> for SettledKind {
    fn from(outcome: &crate::download::DownloadOutcome) -> Self {
        use crate::download::DownloadOutcome;
        match outcome {
            DownloadOutcome::Success { .. } => SettledKind::Saved,
            DownloadOutcome::Skipped => SettledKind::Skipped,
            DownloadOutcome::Failed(e) if e.is_gone() => SettledKind::Gone,
            DownloadOutcome::Failed(_) => SettledKind::Failed,
        }
    }
}

/// Named events that can trigger a registry refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    SessionVerified,
    UploadSucceeded,
    DownloadSettled(SettledKind),
    TimerTick,
}

/// What the registry should do in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshAction {
    /// Refresh immediately
    Now,
    /// Refresh once after the delay; such refreshes stack, never coalesce
    After(Duration),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshScheduler {
    interval: Duration,
    settle_delay: Duration,
}

impl RefreshScheduler {
    pub fn new(interval: Duration, settle_delay: Duration) -> Self {
        Self { interval, settle_delay }
    }

    /// Period for `TimerTick` events
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn action_for(&self, event: DashboardEvent) -> RefreshAction {
        match event {
            DashboardEvent::SessionVerified
            | DashboardEvent::UploadSucceeded
            | DashboardEvent::TimerTick => RefreshAction::Now,
            DashboardEvent::DownloadSettled(SettledKind::Saved) => RefreshAction::After(self.settle_delay),
            DashboardEvent::DownloadSettled(SettledKind::Gone) => RefreshAction::Now,
            DashboardEvent::DownloadSettled(SettledKind::Failed | SettledKind::Skipped) => RefreshAction::None,
        }
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(REFRESH_INTERVAL, DOWNLOAD_SETTLE_DELAY)
    }
}
