//! Apply command - rename a batch on disk

use std::sync::Arc;

use crate::batch::{BatchController, BatchOutcome};
use crate::cli::BatchArgs;
use crate::config::{Settings, SettingsStore};
use crate::history::HistoryFile;
use crate::mover::{FileMover, FsMover};
use crate::ui::output::OutputWriter;
use crate::{TagrenError, engine, output};

use super::{confirm, prefix_code, prepare_batch};

type Result<T> = std::result::Result<T, TagrenError>;

/// Where the apply command keeps its state
#[derive(Debug, Clone)]
pub struct ApplyContext<'a> {
    pub settings: &'a Settings,
    pub settings_store: &'a SettingsStore,
    pub history: &'a HistoryFile,
}

/// Execute the apply command
///
/// # Errors
/// Returns an error if the import fails, the rename cannot be carried out,
/// or the undo record cannot be written
pub async fn execute(
    batch: &BatchArgs,
    yes: bool,
    ctx: &ApplyContext<'_>,
    out: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    execute_with(Arc::new(FsMover), batch, yes, ctx, out, quiet).await
}

/// Execute the apply command with a specific mover
///
/// # Errors
/// See [`execute`]
pub async fn execute_with(
    mover: Arc<dyn FileMover>,
    batch: &BatchArgs,
    yes: bool,
    ctx: &ApplyContext<'_>,
    out: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    let code = prefix_code(batch, ctx.settings);
    let (engine, _worker) = engine::spawn(&code);
    let snapshot = prepare_batch(&engine, batch, ctx.settings, out).await?;

    for entry in &snapshot.entries {
        out.write(&output::rename_line(entry, quiet));
    }

    if !yes && !confirm(&format!("Rename {} file(s)?", snapshot.entries.len()))? {
        out.info("Cancelled");
        return Ok(());
    }

    if batch.prefix.is_some() && snapshot.prefix_code != ctx.settings.prefix_code {
        let mut settings = ctx.settings.clone();
        settings.prefix_code.clone_from(&snapshot.prefix_code);
        ctx.settings_store.save(&settings);
    }

    let controller = BatchController::new(mover);
    match controller.apply(&engine).await? {
        BatchOutcome::Completed { success_count } => {
            ctx.history.store(&controller.history())?;
            out.success(&format!("Renamed {success_count} file(s). Run 'tagren undo' to revert."));
        }
        BatchOutcome::Failed { report, summary } => {
            out.error(&output::failure_headline("Rename", report.error_count, &summary));
            for failure in &report.errors {
                out.info(&output::failure_detail(failure));
            }
        }
        BatchOutcome::Skipped => out.info("Nothing to rename"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ArmedHistory;
    use crate::cli::ImportArgs;
    use crate::ui::output::{BufferWriter, MessageLevel};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        settings: Settings,
        store: SettingsStore,
        history: HistoryFile,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let media = dir.path().join("media");
            fs::create_dir(&media).unwrap();
            let store = SettingsStore::new(dir.path().join("settings.toml"));
            let history = HistoryFile::in_dir(&dir.path().join("data"));
            Self { dir, settings: Settings::default(), store, history }
        }

        fn media(&self) -> std::path::PathBuf {
            self.dir.path().join("media")
        }

        fn ctx(&self) -> ApplyContext<'_> {
            ApplyContext { settings: &self.settings, settings_store: &self.store, history: &self.history }
        }

        fn batch(&self) -> BatchArgs {
            BatchArgs {
                import: ImportArgs { paths: vec![self.media()], recursive: false },
                prefix: Some("7".into()),
                tags: vec!["EXT".into()],
                date: NaiveDate::from_ymd_opt(2024, 3, 4),
                suffix: None,
            }
        }
    }

    #[tokio::test]
    async fn test_apply_renames_and_records_history() {
        let fx = Fixture::new();
        fs::write(fx.media().join("a.jpg"), b"a").unwrap();
        fs::write(fx.media().join("b.mov"), b"b").unwrap();
        let out = BufferWriter::new();

        execute(&fx.batch(), true, &fx.ctx(), &out, true).await.unwrap();

        assert!(fx.media().join("C7_EXT_20240304_1.jpg").exists());
        assert!(fx.media().join("C7_EXT_20240304_2.mov").exists());
        assert!(!fx.media().join("a.jpg").exists());
        assert!(matches!(fx.history.load().unwrap(), ArmedHistory::Armed(p) if p.len() == 2));
        assert_eq!(fx.store.load().prefix_code, "7");
        assert_eq!(out.at_level(MessageLevel::Success).len(), 1);
    }

    #[tokio::test]
    async fn test_apply_conflict_reports_and_keeps_files() {
        let fx = Fixture::new();
        fs::write(fx.media().join("a.jpg"), b"a").unwrap();
        fs::write(fx.media().join("C7_EXT_20240304.jpg"), b"taken").unwrap();

        let mut batch = fx.batch();
        batch.import.paths = vec![fx.media().join("a.jpg")];
        let out = BufferWriter::new();

        execute(&batch, true, &fx.ctx(), &out, true).await.unwrap();

        assert!(fx.media().join("a.jpg").exists());
        assert_eq!(fx.history.load().unwrap(), ArmedHistory::Disarmed);
        let errors = out.at_level(MessageLevel::Error);
        assert_eq!(errors, vec!["Rename failed for 1 file(s): a.jpg"]);
    }
}
