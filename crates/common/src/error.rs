//! Common error types for synthprobe.

use thiserror::Error;

/// Common error type for synthprobe operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Tool execution failed: {tool} - {reason}")]
    ToolExecution { tool: String, reason: String },

    #[error("Tool timed out after {seconds}s: {tool}")]
    ToolTimeout { tool: String, seconds: u64 },

    #[error("Tool output could not be decoded: {tool} - {reason}")]
    ToolOutput { tool: String, reason: String },

    #[error("Platform API request failed: {platform} - {reason}")]
    PlatformApi { platform: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias using common Error.
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Other(e.to_string())
    }
}
