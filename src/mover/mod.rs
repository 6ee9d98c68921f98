//! File mover
//!
//! The disk-facing side of apply and undo. A mover receives `from -> to`
//! pairs and reports per-file success or failure; it only returns `Err` when
//! the call as a whole could not be carried out.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoverError {
    #[error("File mover unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One rename instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePair {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl RenamePair {
    #[must_use]
    pub const fn new(from: PathBuf, to: PathBuf) -> Self {
        Self { from, to }
    }

    /// The same pair pointing the other way
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self { from: self.to.clone(), to: self.from.clone() }
    }
}

/// A file that could not be renamed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameFailure {
    pub file: PathBuf,
    pub reason: String,
}

/// Per-call outcome reported by a mover
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameReport {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<RenameFailure>,
}

impl RenameReport {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error_count == 0
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, file: PathBuf, reason: impl Into<String>) {
        self.error_count += 1;
        self.errors.push(RenameFailure { file, reason: reason.into() });
    }
}

/// Performs renames on behalf of the batch controller
pub trait FileMover: Send + Sync {
    /// Rename every pair, in order.
    ///
    /// # Errors
    ///
    /// Returns `MoverError` only when the call as a whole failed. Individual
    /// file failures belong in the report.
    fn rename(&self, pairs: &[RenamePair]) -> Result<RenameReport, MoverError>;
}

/// Mover backed by `std::fs::rename`
///
/// An existing file at the target is never overwritten; that pair is
/// reported as failed instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMover;

impl FileMover for FsMover {
    fn rename(&self, pairs: &[RenamePair]) -> Result<RenameReport, MoverError> {
        let mut report = RenameReport::default();

        for pair in pairs {
            if pair.from == pair.to {
                report.record_success();
                continue;
            }

            if pair.to.exists() {
                report.record_failure(pair.from.clone(), format!("{} already exists", pair.to.display()));
                continue;
            }

            match fs::rename(&pair.from, &pair.to) {
                Ok(()) => {
                    log::debug!("renamed {} -> {}", pair.from.display(), pair.to.display());
                    report.record_success();
                }
                Err(e) => report.record_failure(pair.from.clone(), e.to_string()),
            }
        }

        Ok(report)
    }
}
