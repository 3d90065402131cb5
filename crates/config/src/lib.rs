//! Configuration loading for Briefcase clients
//!
//! Provides utilities for locating and reading configuration files in the
//! shared Briefcase config directory (~/.config/briefcase/).
//!
//! Call [`init`] at application startup to bootstrap the config directory.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Name of the directory used under the platform config root
const APP_DIR: &str = "briefcase";

/// Initialize the Briefcase config directory.
///
/// Creates ~/.config/briefcase/ if it doesn't exist.
/// Call this once at application startup.
pub fn init() -> Result<PathBuf> {
    ensure_config_dir()
}

/// Get the Briefcase config directory (~/.config/briefcase/)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// Get the path to a config file within the Briefcase config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Platform download directory, used as the default save location
pub fn download_dir() -> Option<PathBuf> {
    dirs::download_dir()
}

/// Load and parse a JSON config file from the Briefcase config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).context("Could not determine config directory")?;
    load_json_file(&path)
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Check if a config file exists in the Briefcase config directory
pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|p| p.exists())
}

/// Ensure the Briefcase config directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().context("Could not determine config directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[test]
    fn test_config_dir() {
        let dir = config_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().ends_with("briefcase"));
    }

    #[test]
    fn test_config_path() {
        let path = config_path("settings.json");
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.ends_with("briefcase/settings.json"));
    }

    #[derive(Deserialize)]
    struct Sample {
        server_url: String,
    }

    #[test]
    fn test_load_json_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sample.json");
        std::fs::write(&path, r#"{ "server_url": "http://example.test" }"#).unwrap();

        let sample: Sample = load_json_file(&path).unwrap();
        assert_eq!(sample.server_url, "http://example.test");
    }

    #[test]
    fn test_load_json_file_missing() {
        let path = Path::new("/nonexistent/briefcase/settings.json");
        let result: Result<Sample> = load_json_file(path);
        assert!(result.is_err());
    }
}
