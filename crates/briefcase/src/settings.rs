//! Client settings
//!
//! Loaded from (in order, later sources override earlier ones):
//! 1. Built-in defaults
//! 2. JSON file (~/.config/briefcase/settings.json)
//! 3. Runtime environment variables

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::scheduler::{DOWNLOAD_SETTLE_DELAY, REFRESH_INTERVAL, RefreshScheduler};

/// Settings filename in the Briefcase config directory
const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub server_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Existing session token, used instead of logging in
    pub session_token: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub refresh_interval_secs: u64,
    pub settle_delay_ms: u64,
    pub action_lock_ms: u64,
    pub request_timeout_secs: u64,
    pub open_after_download: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            email: None,
            password: None,
            session_token: None,
            download_dir: None,
            refresh_interval_secs: REFRESH_INTERVAL.as_secs(),
            settle_delay_ms: DOWNLOAD_SETTLE_DELAY.as_millis() as u64,
            action_lock_ms: 2000,
            request_timeout_secs: 30,
            open_after_download: false,
        }
    }
}

impl ClientSettings {
    /// Load settings from the config file (if present) and the environment
    pub fn load() -> Result<Self> {
        let mut settings = if config::config_exists(SETTINGS_FILE) {
            config::load_json(SETTINGS_FILE)?
        } else {
            Self::default()
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Parse settings from a JSON string; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply `BRIEFCASE_*` overrides from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = non_empty("BRIEFCASE_SERVER") {
            self.server_url = url;
        }
        if let Some(email) = non_empty("BRIEFCASE_EMAIL") {
            self.email = Some(email);
        }
        if let Some(password) = non_empty("BRIEFCASE_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(token) = non_empty("BRIEFCASE_TOKEN") {
            self.session_token = Some(token);
        }
        if let Some(dir) = non_empty("BRIEFCASE_DOWNLOAD_DIR") {
            self.download_dir = Some(PathBuf::from(dir));
        }
    }

    /// Get the default settings file path (~/.config/briefcase/settings.json)
    pub fn default_settings_path() -> Option<PathBuf> {
        config::config_path(SETTINGS_FILE)
    }

    /// Where downloads are saved: configured dir, platform download dir, or `.`
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(config::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }

    pub fn scheduler(&self) -> RefreshScheduler {
        RefreshScheduler::new(
            Duration::from_secs(self.refresh_interval_secs.max(1)),
            Duration::from_millis(self.settle_delay_ms),
        )
    }

    pub fn action_lock(&self) -> Duration {
        Duration::from_millis(self.action_lock_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
