//! Error types for the scripted decision adapter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for script loading
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Errors that can occur while loading a decision script
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
}
