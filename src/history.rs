//! On-disk copy of the armed history
//!
//! The command-line `apply` and `undo` run in separate processes, so the
//! undo record of the last successful apply is kept as JSON between them.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::batch::ArmedHistory;
use crate::mover::RenamePair;

const HISTORY_FILE: &str = "last_batch.json";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to access undo record: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid undo record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for history persistence
pub type Result<T> = std::result::Result<T, HistoryError>;

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    applied_at: DateTime<Local>,
    pairs: Vec<RenamePair>,
}

/// JSON file holding the last batch's rename pairs
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// File inside the given data directory
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(HISTORY_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist an armed history, or remove the file for a disarmed one.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if the file cannot be written or removed.
    pub fn store(&self, history: &ArmedHistory) -> Result<()> {
        match history {
            ArmedHistory::Disarmed => self.clear(),
            ArmedHistory::Armed(pairs) => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let record = Record { applied_at: Local::now(), pairs: pairs.clone() };
                fs::write(&self.path, serde_json::to_string_pretty(&record)?)?;
                Ok(())
            }
        }
    }

    /// Load the recorded history; a missing file means nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<ArmedHistory> {
        if !self.path.exists() {
            return Ok(ArmedHistory::Disarmed);
        }

        let record: Record = serde_json::from_str(&fs::read_to_string(&self.path)?)?;
        log::debug!("loaded undo record from {}", record.applied_at);

        if record.pairs.is_empty() {
            Ok(ArmedHistory::Disarmed)
        } else {
            Ok(ArmedHistory::Armed(record.pairs))
        }
    }

    /// Remove the file if present.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Io` if an existing file cannot be removed.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
