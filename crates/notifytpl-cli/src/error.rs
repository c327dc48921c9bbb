//! Error handling for the command-line tool

use std::path::PathBuf;

use notifytpl::{NotifyTplError, PayloadError};
use thiserror::Error;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Engine(#[from] NotifyTplError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<PayloadError> for CliError {
    fn from(error: PayloadError) -> Self {
        Self::Engine(error.into())
    }
}

impl CliError {
    /// Message suitable for the terminal
    pub fn user_message(&self) -> String {
        match self {
            CliError::Engine(e) => e.user_message(),
            _ => self.to_string(),
        }
    }
}
