//! Browse command - interactive batch renamer

use std::sync::Arc;

use crate::batch::{ArmedHistory, BatchController};
use crate::cli::ImportArgs;
use crate::config::{Settings, SettingsStore};
use crate::history::HistoryFile;
use crate::mover::FsMover;
use crate::tags::Catalog;
use crate::ui::UiError;
use crate::ui::ratatui_adapter::{Browser, BrowserContext};
use crate::{TagrenError, engine, import};

type Result<T> = std::result::Result<T, TagrenError>;

/// Execute the browse command
///
/// Paths given on the command line are imported before the browser opens.
/// The undo record of a previous batch is loaded so it can still be undone.
///
/// # Errors
/// Returns an error if the initial import fails, the terminal cannot be
/// driven, or the engine stops
pub async fn execute(
    args: &ImportArgs,
    settings: Settings,
    settings_store: SettingsStore,
    catalog: Catalog,
    history: HistoryFile,
) -> Result<()> {
    let (engine, _worker) = engine::spawn(&settings.prefix_code);

    if !args.paths.is_empty() {
        let report = import::import(&args.paths, args.recursive, &settings.allowed_file_types)?;
        for (path, reason) in &report.skipped {
            log::info!("skipped {}: {reason}", path.display());
        }
        engine.init(report.entries).await?;
    }

    let armed = history.load().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable undo record: {e}");
        ArmedHistory::Disarmed
    });

    let ctx = BrowserContext {
        engine,
        controller: BatchController::with_history(Arc::new(FsMover), armed),
        catalog,
        settings,
        settings_store,
        history,
        recursive: args.recursive,
        runtime: tokio::runtime::Handle::current(),
    };

    tokio::task::spawn_blocking(move || Browser::new().run(ctx))
        .await
        .map_err(|e| UiError::Task(e.to_string()))??;

    Ok(())
}
