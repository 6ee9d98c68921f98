//! Output formatting for CLI display

use colored::Colorize;

use crate::batch::FailureSummary;
use crate::mover::RenameFailure;
use crate::store::FileEntry;

/// Format one planned rename as `original -> new`
#[must_use]
pub fn rename_line(entry: &FileEntry, quiet: bool) -> String {
    let target = entry
        .target_path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if quiet {
        format!("{}\t{target}", entry.original_name)
    } else {
        format!("  {} {} {}", entry.original_name, "->".dimmed(), target.green())
    }
}

/// Format a tag with its description
#[must_use]
pub fn tag_line(id: &str, description: &str, quiet: bool) -> String {
    if quiet {
        id.to_string()
    } else {
        format!("  {:<6} {}", id.bold(), description)
    }
}

/// Headline for a partially failed apply or undo
#[must_use]
pub fn failure_headline(operation: &str, error_count: usize, summary: &FailureSummary) -> String {
    format!("{operation} failed for {error_count} file(s): {summary}")
}

/// One line per failed file
#[must_use]
pub fn failure_detail(failure: &RenameFailure) -> String {
    format!("  {}: {}", failure.file.display(), failure.reason.red())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_entry;

    #[test]
    fn test_rename_line_quiet() {
        let mut entry = test_entry(1, "IMG_1.jpg");
        entry.computed_name = "C42_x_20240102".to_string();
        assert_eq!(rename_line(&entry, true), "IMG_1.jpg\tC42_x_20240102.jpg");
    }

    #[test]
    fn test_tag_line_quiet() {
        assert_eq!(tag_line("EXT", "Exterior", true), "EXT");
    }

    #[test]
    fn test_failure_headline() {
        let summary = FailureSummary { files: vec!["a.jpg".into()], remaining: 0 };
        assert_eq!(
            failure_headline("Rename", 1, &summary),
            "Rename failed for 1 file(s): a.jpg"
        );
    }
}
