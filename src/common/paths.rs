//! Project layout and configuration paths
//!
//! Collections and the shared environment live under `<root>/postman`,
//! HTML reports and the run log under `<root>/reports`.

use std::io;
use std::path::PathBuf;

/// Name used for the config directory
const APP_NAME: &str = "nasa-mock-runner";

/// Directory holding collection and environment definitions
const COLLECTIONS_DIR: &str = "postman";

/// Directory receiving HTML reports
const REPORTS_DIR: &str = "reports";

/// Shared environment file used by every collection
const ENVIRONMENT_FILE: &str = "nasa-env.environment.yaml";

/// Log file written next to the reports during a run
const LOG_FILE: &str = "harness.log";

/// Resolved file-system layout of a harness checkout
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Create a layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn collections_dir(&self) -> PathBuf {
        self.root.join(COLLECTIONS_DIR)
    }

    /// Path to a collection definition file by file name
    pub fn collection_file(&self, file_name: &str) -> PathBuf {
        self.collections_dir().join(file_name)
    }

    pub fn environment_file(&self) -> PathBuf {
        self.collections_dir().join(ENVIRONMENT_FILE)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join(REPORTS_DIR)
    }

    /// Path to an HTML report by file name
    pub fn report_file(&self, file_name: &str) -> PathBuf {
        self.reports_dir().join(file_name)
    }

    pub fn log_file(&self) -> PathBuf {
        self.reports_dir().join(LOG_FILE)
    }

    /// Ensure the reports directory exists
    ///
    /// Idempotent: an existing directory is not an error.
    pub fn ensure_reports_dir(&self) -> io::Result<PathBuf> {
        let dir = self.reports_dir();
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/nasa-mock-runner/`
/// - macOS: `~/Library/Application Support/nasa-mock-runner/`
/// - Windows: `%APPDATA%\nasa-mock-runner\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
