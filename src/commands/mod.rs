//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI
//! args and runs the operation.

pub mod apply;
pub mod browse;
pub mod config;
pub mod preview;
pub mod tags;
pub mod undo;

pub use apply::execute as apply;
pub use browse::execute as browse;
pub use config::execute as config;
pub use preview::execute as preview;
pub use tags::execute as tags;
pub use undo::execute as undo;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::cli::BatchArgs;
use crate::config::Settings;
use crate::engine::EngineHandle;
use crate::import;
use crate::store::Snapshot;
use crate::ui::output::OutputWriter;
use crate::TagrenError;

type Result<T> = std::result::Result<T, TagrenError>;

/// Prefix code for a batch: the flag if given, else the saved one
#[must_use]
pub fn prefix_code(batch: &BatchArgs, settings: &Settings) -> String {
    batch.prefix.clone().unwrap_or_else(|| settings.prefix_code.clone())
}

/// Import the batch's paths into the engine and apply the shared metadata.
///
/// # Errors
///
/// Returns `TagrenError` if the import fails, finds nothing usable, or the
/// engine stops.
pub async fn prepare_batch(
    engine: &EngineHandle,
    batch: &BatchArgs,
    settings: &Settings,
    out: &dyn OutputWriter,
) -> Result<Arc<Snapshot>> {
    let report = import::import(
        &batch.import.paths,
        batch.import.recursive,
        &settings.allowed_file_types,
    )?;

    for (path, reason) in &report.skipped {
        out.info(&format!("Skipped {}: {reason}", path.display()));
    }

    if report.entries.is_empty() {
        return Err(TagrenError::InvalidInput("No media files to rename".into()));
    }

    let snapshot = engine.init(report.entries).await?;

    for entry in &snapshot.entries {
        if !batch.tags.is_empty() {
            engine.set_tags(entry.id, batch.tags.clone()).await?;
        }
        if let Some(date) = batch.date {
            engine.set_capture_date(entry.id, date).await?;
        }
        if let Some(suffix) = &batch.suffix {
            engine.set_suffix(entry.id, suffix.clone()).await?;
        }
    }

    Ok(engine.snapshot().await?)
}

/// Prompt user for yes/no confirmation on stdin
///
/// # Errors
///
/// Returns `TagrenError` if I/O operations fail.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/n]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
