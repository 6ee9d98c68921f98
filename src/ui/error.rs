//! UI error types

use thiserror::Error;

/// Errors that can occur in the interactive front-end
#[derive(Debug, Error)]
pub enum UiError {
    /// IO error while drawing or reading terminal events
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The engine worker went away while the UI was running
    #[error("Engine unavailable: {0}")]
    Engine(#[from] crate::engine::EngineError),

    /// The UI thread stopped unexpectedly
    #[error("UI task failed: {0}")]
    Task(String),
}

/// Result type for UI operations
pub type Result<T> = std::result::Result<T, UiError>;
