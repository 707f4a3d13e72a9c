//! Error types for the mock runner
//!
//! Messages are written to be read straight off a failing CI log, so each
//! variant says what failed and where.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the mock runner
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === Collection Errors ===
    #[error("Failed to load '{path}': {error}")]
    CollectionLoad { path: String, error: String },

    #[error("Collection \"{name}\" failed: {message}")]
    CollectionFailed { name: String, message: String },

    #[error("{} collection(s) failed: {}", .0.len(), .0.join(", "))]
    CollectionsFailed(Vec<String>),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to write report: {0}")]
    Report(String),

    // === Fixture Server Errors ===
    #[error("Failed to bind fixture server to {addr}: {error}")]
    ServerBind { addr: SocketAddr, error: io::Error },

    #[error("Fixture server stopped unexpectedly: {0}")]
    ServerStopped(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Create a collection load error for a file path
    pub fn collection_load(path: &std::path::Path, error: impl ToString) -> Self {
        Self::CollectionLoad {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a collection failed error
    pub fn collection_failed(name: &str, message: &str) -> Self {
        Self::CollectionFailed {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}
