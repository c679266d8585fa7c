// ⚙️ Application configuration
// Base data directory (under the user's home) and the credit ceiling.

use crate::enrollment_service::DEFAULT_MAX_CREDITS;
use chrono::Utc;
use std::env;
use std::path::{Path, PathBuf};

/// Directory created under the home directory for exports and backups
pub const DATA_DIR_NAME: &str = "ccrm_data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub max_credits: u32,
}

impl AppConfig {
    /// Resolve `<home>/ccrm_data` from the environment
    pub fn from_env() -> Self {
        AppConfig {
            data_dir: home_dir().join(DATA_DIR_NAME),
            max_credits: DEFAULT_MAX_CREDITS,
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_max_credits(mut self, max_credits: u32) -> Self {
        self.max_credits = max_credits;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// HOME, then USERPROFILE, then the working directory
fn home_dir() -> PathBuf {
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(|key| env::var_os(key))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Current UTC instant as a single path segment, e.g. `2026-10-17T09-14-03.123456789Z`
pub fn snapshot_timestamp() -> String {
    Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.9fZ")
        .to_string()
        .replace(':', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_uses_data_dir_name() {
        let config = AppConfig::from_env();
        assert!(config.data_dir.ends_with(DATA_DIR_NAME));
        assert_eq!(config.max_credits, 18);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_env()
            .with_data_dir("/tmp/ccrm")
            .with_max_credits(24);

        assert_eq!(config.data_dir(), Path::new("/tmp/ccrm"));
        assert_eq!(config.max_credits, 24);
    }

    #[test]
    fn test_snapshot_timestamp_is_path_safe() {
        let ts = snapshot_timestamp();

        assert!(!ts.contains(':'));
        assert!(!ts.contains('/'));
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-10-17T09-14-03.123456789Z".len());
    }
}
