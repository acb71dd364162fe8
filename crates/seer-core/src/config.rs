//! Configuration for verification runs
//!
//! This module provides the configuration structure for the harness: the
//! target base URL, the artifact directory for screenshots, browser toggles,
//! and the per-phase wait budgets of the scenario.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Result, SeerError};

/// Harness configuration
///
/// Loaded from `seer-verify.toml` when present; every field has a default so
/// a bare `seer-verify run` works against a local dev server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Base URL of the application under test
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory where checkpoint screenshots are written
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Run the browser headless
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Keep the Chromium sandbox enabled (disable in containers without one)
    #[serde(default = "default_sandbox")]
    pub sandbox: bool,

    /// Per-phase wait budgets
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Wait budgets for each scenario phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeouts {
    /// Page load budget in seconds
    #[serde(default = "default_navigation_secs")]
    pub navigation_secs: u64,

    /// Budget for the model selector to finish populating
    #[serde(default = "default_readiness_secs")]
    pub readiness_secs: u64,

    /// Budget for each in-progress indicator to clear
    #[serde(default = "default_completion_secs")]
    pub completion_secs: u64,

    /// Budget for each outcome/post-reset assertion
    #[serde(default = "default_outcome_secs")]
    pub outcome_secs: u64,

    /// Interval between DOM polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

// Default value providers
fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("verification")
}

fn default_headless() -> bool {
    true
}

fn default_sandbox() -> bool {
    true
}

fn default_navigation_secs() -> u64 {
    60
}

fn default_readiness_secs() -> u64 {
    30
}

fn default_completion_secs() -> u64 {
    90
}

fn default_outcome_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    250
}

impl VerifyConfig {
    /// Load configuration from a TOML file, or use defaults if it is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| SeerError::Config(format!("Failed to parse {}: {}", path.display(), e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Absolute or relative path of an artifact with the given file name
    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.artifact_dir.join(file_name)
    }
}

impl Timeouts {
    pub fn navigation(&self) -> Duration {
        Duration::from_secs(self.navigation_secs)
    }

    pub fn readiness(&self) -> Duration {
        Duration::from_secs(self.readiness_secs)
    }

    pub fn completion(&self) -> Duration {
        Duration::from_secs(self.completion_secs)
    }

    pub fn outcome(&self) -> Duration {
        Duration::from_secs(self.outcome_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            artifact_dir: default_artifact_dir(),
            headless: default_headless(),
            sandbox: default_sandbox(),
            timeouts: Timeouts::default(),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_secs: default_navigation_secs(),
            readiness_secs: default_readiness_secs(),
            completion_secs: default_completion_secs(),
            outcome_secs: default_outcome_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = VerifyConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.artifact_dir, PathBuf::from("verification"));
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!(config.timeouts.navigation_secs, 60);
        assert_eq!(config.timeouts.readiness_secs, 30);
        assert_eq!(config.timeouts.completion_secs, 90);
        assert_eq!(config.timeouts.outcome_secs, 30);
        assert_eq!(config.timeouts.poll_interval_ms, 250);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = VerifyConfig::load_or_default(Path::new("/nonexistent/seer-verify.toml"))
            .expect("missing file should fall back to defaults");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://127.0.0.1:8080\"").unwrap();
        writeln!(file, "[timeouts]").unwrap();
        writeln!(file, "completion_secs = 120").unwrap();

        let config = VerifyConfig::load_or_default(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeouts.completion_secs, 120);
        // unspecified fields keep their defaults
        assert!(config.headless);
        assert_eq!(config.timeouts.navigation_secs, 60);
    }

    #[test]
    fn test_load_invalid_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = [not toml").unwrap();

        let err = VerifyConfig::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, SeerError::Config(_)));
    }

    #[test]
    fn test_duration_accessors() {
        let timeouts = Timeouts::default();
        assert_eq!(timeouts.navigation(), Duration::from_secs(60));
        assert_eq!(timeouts.completion(), Duration::from_secs(90));
        assert_eq!(timeouts.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_artifact_path_joins_dir() {
        let config = VerifyConfig::default();
        assert_eq!(
            config.artifact_path("01_analysis_complete.png"),
            PathBuf::from("verification/01_analysis_complete.png")
        );
    }
}
