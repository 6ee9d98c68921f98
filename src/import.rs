//! Importer
//!
//! Turns user-supplied files and folders into [`NewEntry`] records. Folders
//! are scanned one level deep unless recursion is requested. Only files with
//! an allowed extension that classify as image or video are kept.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;
use walkdir::WalkDir;

use crate::store::{MediaKind, NewEntry};

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "heic", "heif", "tif", "tiff", "webp",
];
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "mkv", "m4v", "wmv", "webm", "mts", "3gp",
];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Path not found: {0}")]
    NotFound(PathBuf),
    #[error("No paths given")]
    NoPaths,
}

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Accepted files plus everything that was passed over and why
#[derive(Debug, Default)]
pub struct ImportReport {
    pub entries: Vec<NewEntry>,
    pub skipped: Vec<(PathBuf, String)>,
}

/// Classify a path as image or video from its extension.
#[must_use]
pub fn media_kind(path: &Path) -> Option<MediaKind> {
    let ext = extension(path)?;
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// Import files and folders.
///
/// `allowed` holds lowercase extensions without a leading dot. The returned
/// entries are sorted by path.
///
/// # Errors
///
/// Returns `ImportError::NoPaths` for an empty input and
/// `ImportError::NotFound` when a given path does not exist.
pub fn import(paths: &[PathBuf], recursive: bool, allowed: &[String]) -> Result<ImportReport> {
    if paths.is_empty() {
        return Err(ImportError::NoPaths);
    }

    let mut report = ImportReport::default();
    let mut candidates = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(ImportError::NotFound(path.clone()));
        }

        if path.is_dir() {
            let max_depth = if recursive { usize::MAX } else { 1 };
            for entry in WalkDir::new(path).max_depth(max_depth) {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => candidates.push(entry.into_path()),
                    Ok(_) => {}
                    Err(e) => {
                        let at = e.path().map_or_else(|| path.clone(), Path::to_path_buf);
                        log::warn!("skipping {}: {e}", at.display());
                        report.skipped.push((at, e.to_string()));
                    }
                }
            }
        } else {
            candidates.push(path.clone());
        }
    }

    candidates.sort();
    candidates.dedup();

    for path in candidates {
        match accept(&path, allowed) {
            Ok(entry) => report.entries.push(entry),
            Err(reason) => {
                log::debug!("skipping {}: {reason}", path.display());
                report.skipped.push((path, reason));
            }
        }
    }

    log::info!(
        "imported {} files, skipped {}",
        report.entries.len(),
        report.skipped.len()
    );
    Ok(report)
}

fn accept(path: &Path, allowed: &[String]) -> std::result::Result<NewEntry, String> {
    let ext = extension(path).ok_or_else(|| "no file extension".to_string())?;
    if !allowed.iter().any(|a| *a == ext) {
        return Err(format!(".{ext} is not an allowed file type"));
    }

    let kind = media_kind(path).ok_or_else(|| "not an image or video".to_string())?;
    let source_path = fs::canonicalize(path).map_err(|e| e.to_string())?;
    let capture_date = modified_date(&source_path).map_err(|e| e.to_string())?;

    Ok(NewEntry::new(source_path, capture_date, kind))
}

/// Local calendar date of the file's modification time
fn modified_date(path: &Path) -> std::io::Result<NaiveDate> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn allowed() -> Vec<String> {
        ["jpg", "jpeg", "png", "mp4", "mov", "txt"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"data").unwrap();
        path
    }

    #[test]
    fn test_media_kind() {
        assert_eq!(media_kind(Path::new("a.JPG")), Some(MediaKind::Image));
        assert_eq!(media_kind(Path::new("a.mov")), Some(MediaKind::Video));
        assert_eq!(media_kind(Path::new("a.txt")), None);
        assert_eq!(media_kind(Path::new("noext")), None);
    }

    #[test]
    fn test_import_directory_shallow() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.jpg");
        touch(dir.path(), "a.MP4");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "raw.nef");
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        touch(&sub, "deep.png");

        let report = import(&[dir.path().to_path_buf()], false, &allowed()).unwrap();
        let names: Vec<String> = report
            .entries
            .iter()
            .map(|e| e.source_path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.MP4", "b.jpg"]);
        assert_eq!(report.entries[0].kind, MediaKind::Video);
        assert_eq!(report.skipped.len(), 2);
    }

    #[test]
    fn test_import_directory_recursive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg");
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        touch(&sub, "deep.png");

        let report = import(&[dir.path().to_path_buf()], true, &allowed()).unwrap();
        assert_eq!(report.entries.len(), 2);
    }

    #[test]
    fn test_import_single_file_is_absolute() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "clip.mov");

        let report = import(&[file], false, &allowed()).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert!(report.entries[0].source_path.is_absolute());
    }

    #[test]
    fn test_import_missing_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            import(&[missing], false, &allowed()),
            Err(ImportError::NotFound(_))
        ));
        assert!(matches!(import(&[], false, &allowed()), Err(ImportError::NoPaths)));
    }

    #[test]
    fn test_disallowed_extension_skipped() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "pic.png");
        let only_jpg = vec!["jpg".to_string()];

        let report = import(&[file], false, &only_jpg).unwrap();
        assert!(report.entries.is_empty());
        assert!(report.skipped[0].1.contains("not an allowed"));
    }
}
