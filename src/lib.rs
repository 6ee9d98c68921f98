//! Tagren - tag, date and batch-rename media files
//!
//! Imported files get a deterministic new name built from a batch-wide
//! prefix code, their tags, capture date, position and an optional suffix.
//! The rename is applied in one batch and the most recent batch can be
//! undone.

use thiserror::Error;

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod history;
pub mod import;
pub mod logging;
pub mod mover;
pub mod naming;
pub mod output;
pub mod selection;
pub mod store;
pub mod tags;
pub mod ui;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum TagrenError {
    /// Engine worker error
    #[error("Engine error: {0}")]
    EngineError(#[from] engine::EngineError),
    /// Apply/undo error
    #[error("Batch error: {0}")]
    BatchError(#[from] batch::BatchError),
    /// File mover error
    #[error("Mover error: {0}")]
    MoverError(#[from] mover::MoverError),
    /// Import error
    #[error("Import error: {0}")]
    ImportError(#[from] import::ImportError),
    /// Tag catalog error
    #[error("Tag catalog error: {0}")]
    CatalogError(#[from] tags::CatalogError),
    /// Persisted undo record error
    #[error("Undo record error: {0}")]
    HistoryError(#[from] history::HistoryError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Terminal UI error
    #[error("UI error: {0}")]
    UiError(#[from] ui::UiError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
