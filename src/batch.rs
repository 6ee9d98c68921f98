//! Batch apply/undo controller
//!
//! Sends the current batch to a [`FileMover`] and keeps the single-level
//! undo record. On full success the history is armed and the renamed
//! entries leave the engine's store; files imported while the mover ran stay
//! behind. Any per-file failure leaves both untouched so the user can fix
//! the cause and retry. A retry re-sends every pair, including those the
//! mover already completed.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::engine::{EngineError, EngineHandle};
use crate::mover::{FileMover, RenamePair, RenameReport};

/// Number of failing files named in a summary
pub const SUMMARY_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Another apply or undo is already running")]
    Busy,
    #[error("Rename could not be carried out: {0}")]
    Transport(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for batch operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// Undo record of the most recent fully successful apply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArmedHistory {
    #[default]
    Disarmed,
    Armed(Vec<RenamePair>),
}

impl ArmedHistory {
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self, Self::Armed(_))
    }

    #[must_use]
    pub fn pairs(&self) -> &[RenamePair] {
        match self {
            Self::Armed(pairs) => pairs,
            Self::Disarmed => &[],
        }
    }

    /// Pairs that restore the original names, last rename first
    #[must_use]
    pub fn undo_pairs(&self) -> Vec<RenamePair> {
        self.pairs().iter().rev().map(RenamePair::reversed).collect()
    }
}

/// First few failing file names plus how many were left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSummary {
    pub files: Vec<String>,
    pub remaining: usize,
}

impl FailureSummary {
    #[must_use]
    pub fn from_report(report: &RenameReport) -> Self {
        let files: Vec<String> = report
            .errors
            .iter()
            .take(SUMMARY_LIMIT)
            .map(|failure| display_name(&failure.file))
            .collect();
        let remaining = report.error_count.saturating_sub(files.len());

        Self { files, remaining }
    }
}

impl fmt::Display for FailureSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.files.join(", "))?;
        if self.remaining > 0 {
            write!(f, " and {} more...", self.remaining)?;
        }
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// What an apply or undo call amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every file renamed
    Completed { success_count: usize },
    /// At least one file failed; nothing was changed in memory
    Failed {
        report: RenameReport,
        summary: FailureSummary,
    },
    /// Nothing to do: empty batch or no armed history
    Skipped,
}

struct Inner {
    mover: Arc<dyn FileMover>,
    history: Mutex<ArmedHistory>,
    busy: AtomicBool,
}

/// Cloneable handle to the controller
#[derive(Clone)]
pub struct BatchController {
    inner: Arc<Inner>,
}

impl fmt::Debug for BatchController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchController")
            .field("history", &*self.lock_history())
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BatchController {
    #[must_use]
    pub fn new(mover: Arc<dyn FileMover>) -> Self {
        Self::with_history(mover, ArmedHistory::Disarmed)
    }

    /// Start from a previously recorded history
    #[must_use]
    pub fn with_history(mover: Arc<dyn FileMover>, history: ArmedHistory) -> Self {
        Self {
            inner: Arc::new(Inner {
                mover,
                history: Mutex::new(history),
                busy: AtomicBool::new(false),
            }),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.lock_history().is_armed()
    }

    #[must_use]
    pub fn history(&self) -> ArmedHistory {
        self.lock_history().clone()
    }

    /// Rename every entry of the engine's current batch.
    ///
    /// # Errors
    ///
    /// Returns `BatchError::Busy` while another apply or undo runs,
    /// `BatchError::Transport` if the mover call itself failed, and
    /// `BatchError::Engine` if the engine worker is gone.
    pub async fn apply(&self, engine: &EngineHandle) -> Result<BatchOutcome> {
        let _guard = self.acquire()?;

        let snapshot = engine.snapshot().await?;
        if snapshot.is_empty() {
            return Ok(BatchOutcome::Skipped);
        }

        let pairs: Vec<RenamePair> = snapshot
            .entries
            .iter()
            .map(|entry| RenamePair::new(entry.source_path.clone(), entry.target_path()))
            .collect();

        log::info!("applying rename batch of {} files", pairs.len());
        let report = self.run_mover(pairs.clone()).await?;

        if !report.is_success() {
            return Ok(failed("apply", report));
        }

        *self.lock_history() = ArmedHistory::Armed(pairs);
        log::info!("rename batch completed: {} files", report.success_count);

        // Entries added while the mover ran were not renamed and stay.
        let applied = snapshot.entries.iter().map(|entry| entry.id).collect();
        engine.remove(applied).await?;

        Ok(BatchOutcome::Completed { success_count: report.success_count })
    }

    /// Reverse the most recent successful apply.
    ///
    /// # Errors
    ///
    /// Returns `BatchError::Busy` while another apply or undo runs and
    /// `BatchError::Transport` if the mover call itself failed.
    pub async fn undo(&self) -> Result<BatchOutcome> {
        let _guard = self.acquire()?;

        let pairs = self.lock_history().undo_pairs();
        if pairs.is_empty() {
            return Ok(BatchOutcome::Skipped);
        }

        log::info!("undoing rename batch of {} files", pairs.len());
        let report = self.run_mover(pairs).await?;

        if !report.is_success() {
            return Ok(failed("undo", report));
        }

        *self.lock_history() = ArmedHistory::Disarmed;
        Ok(BatchOutcome::Completed { success_count: report.success_count })
    }

    async fn run_mover(&self, pairs: Vec<RenamePair>) -> Result<RenameReport> {
        let mover = Arc::clone(&self.inner.mover);

        tokio::task::spawn_blocking(move || mover.rename(&pairs))
            .await
            .map_err(|e| BatchError::Transport(e.to_string()))?
            .map_err(|e| BatchError::Transport(e.to_string()))
    }

    fn acquire(&self) -> Result<BusyGuard<'_>> {
        self.inner
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BatchError::Busy)?;
        Ok(BusyGuard(&self.inner.busy))
    }

    fn lock_history(&self) -> MutexGuard<'_, ArmedHistory> {
        self.inner.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn failed(operation: &str, report: RenameReport) -> BatchOutcome {
    for failure in &report.errors {
        log::error!("{operation} failed for {}: {}", failure.file.display(), failure.reason);
    }

    let summary = FailureSummary::from_report(&report);
    BatchOutcome::Failed { report, summary }
}
