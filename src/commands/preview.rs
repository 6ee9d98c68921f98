//! Preview command - print planned renames without touching disk

use crate::cli::BatchArgs;
use crate::config::Settings;
use crate::ui::output::OutputWriter;
use crate::{TagrenError, engine, output};

use super::{prefix_code, prepare_batch};

type Result<T> = std::result::Result<T, TagrenError>;

/// Execute the preview command
///
/// # Errors
/// Returns an error if the import fails or finds no media files
pub async fn execute(
    batch: &BatchArgs,
    settings: &Settings,
    out: &dyn OutputWriter,
    quiet: bool,
) -> Result<()> {
    let (engine, _worker) = engine::spawn(&prefix_code(batch, settings));
    let snapshot = prepare_batch(&engine, batch, settings, out).await?;

    out.info(&format!(
        "{} file(s) with prefix {}:",
        snapshot.entries.len(),
        snapshot.prefix()
    ));
    for entry in &snapshot.entries {
        out.write(&output::rename_line(entry, quiet));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ImportArgs;
    use crate::ui::output::{BufferWriter, MessageLevel};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_preview_lists_names_without_renaming() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.jpg"), b"b").unwrap();
        fs::write(dir.path().join("a.jpg"), b"a").unwrap();

        let batch = BatchArgs {
            import: ImportArgs { paths: vec![dir.path().to_path_buf()], recursive: false },
            prefix: Some("42".into()),
            tags: vec!["x".into()],
            date: NaiveDate::from_ymd_opt(2024, 1, 2),
            suffix: None,
        };
        let out = BufferWriter::new();

        execute(&batch, &Settings::default(), &out, true).await.unwrap();

        assert_eq!(
            out.at_level(MessageLevel::Normal),
            vec![
                "a.jpg\tC42_x_20240102_1.jpg",
                "b.jpg\tC42_x_20240102_2.jpg",
            ]
        );
        assert!(dir.path().join("a.jpg").exists());
    }

    #[tokio::test]
    async fn test_preview_with_nothing_to_import() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), b"n").unwrap();

        let batch = BatchArgs {
            import: ImportArgs { paths: vec![dir.path().to_path_buf()], recursive: false },
            ..BatchArgs::default()
        };
        let out = BufferWriter::new();

        let result = execute(&batch, &Settings::default(), &out, true).await;
        assert!(matches!(result, Err(TagrenError::InvalidInput(_))));
    }
}
