//! Undo command - restore the names of the last applied batch

use std::sync::Arc;

use crate::TagrenError;
use crate::batch::{BatchController, BatchOutcome};
use crate::history::HistoryFile;
use crate::mover::{FileMover, FsMover};
use crate::output;
use crate::ui::output::OutputWriter;

type Result<T> = std::result::Result<T, TagrenError>;

/// Execute the undo command
///
/// # Errors
/// Returns an error if the undo record cannot be read or removed, or the
/// rename cannot be carried out
pub async fn execute(history: &HistoryFile, out: &dyn OutputWriter) -> Result<()> {
    execute_with(Arc::new(FsMover), history, out).await
}

/// Execute the undo command with a specific mover
///
/// # Errors
/// See [`execute`]
pub async fn execute_with(
    mover: Arc<dyn FileMover>,
    history: &HistoryFile,
    out: &dyn OutputWriter,
) -> Result<()> {
    let record = history.load()?;
    if !record.is_armed() {
        out.info("Nothing to undo");
        return Ok(());
    }

    let controller = BatchController::with_history(mover, record);
    match controller.undo().await? {
        BatchOutcome::Completed { success_count } => {
            history.clear()?;
            out.success(&format!("Restored {success_count} file(s)"));
        }
        BatchOutcome::Failed { report, summary } => {
            out.error(&output::failure_headline("Undo", report.error_count, &summary));
            for failure in &report.errors {
                out.info(&output::failure_detail(failure));
            }
            out.info("The undo record was kept; run 'tagren undo' again to retry.");
        }
        BatchOutcome::Skipped => out.info("Nothing to undo"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ArmedHistory;
    use crate::mover::RenamePair;
    use crate::ui::output::{BufferWriter, MessageLevel};
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_undo_restores_and_clears_record() {
        let dir = TempDir::new().unwrap();
        let renamed = dir.path().join("C_x_20240102.jpg");
        let original = dir.path().join("a.jpg");
        fs::write(&renamed, b"a").unwrap();

        let history = HistoryFile::in_dir(dir.path());
        history
            .store(&ArmedHistory::Armed(vec![RenamePair::new(original.clone(), renamed.clone())]))
            .unwrap();
        let out = BufferWriter::new();

        execute(&history, &out).await.unwrap();

        assert!(original.exists());
        assert!(!renamed.exists());
        assert!(!history.path().exists());
        assert_eq!(out.at_level(MessageLevel::Success), vec!["Restored 1 file(s)"]);
    }

    #[tokio::test]
    async fn test_undo_failure_keeps_record() {
        let dir = TempDir::new().unwrap();
        let history = HistoryFile::in_dir(dir.path());
        let armed = ArmedHistory::Armed(vec![RenamePair::new(
            dir.path().join("a.jpg"),
            dir.path().join("gone.jpg"),
        )]);
        history.store(&armed).unwrap();
        let out = BufferWriter::new();

        execute(&history, &out).await.unwrap();

        assert_eq!(history.load().unwrap(), armed);
        assert_eq!(out.at_level(MessageLevel::Error), vec!["Undo failed for 1 file(s): gone.jpg"]);
    }

    #[tokio::test]
    async fn test_nothing_to_undo() {
        let dir = TempDir::new().unwrap();
        let out = BufferWriter::new();
        execute(&HistoryFile::in_dir(dir.path()), &out).await.unwrap();
        assert_eq!(out.at_level(MessageLevel::Info), vec!["Nothing to undo"]);
    }
}
