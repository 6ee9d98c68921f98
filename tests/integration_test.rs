//! Integration tests for tagren
//!
//! These drive the engine and batch controller through the public API, with
//! a scripted mover standing in for the filesystem and, at the end, the real
//! importer and mover on a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tagren::batch::{ArmedHistory, BatchController, BatchOutcome};
use tagren::engine::{self, EngineHandle};
use tagren::history::HistoryFile;
use tagren::import;
use tagren::mover::{FileMover, FsMover, MoverError, RenameFailure, RenamePair, RenameReport};
use tagren::selection::{SelectionIntent, SelectionModel};
use tagren::store::{MediaKind, NewEntry};
use tempfile::TempDir;

/// Mover that records every call and fails for configured source files
#[derive(Default)]
struct ScriptedMover {
    calls: Mutex<Vec<Vec<RenamePair>>>,
    failing: Vec<PathBuf>,
}

impl ScriptedMover {
    fn failing(files: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: files.iter().map(|f| PathBuf::from("/media").join(f)).collect(),
        }
    }

    fn calls(&self) -> Vec<Vec<RenamePair>> {
        self.calls.lock().unwrap().clone()
    }
}

impl FileMover for ScriptedMover {
    fn rename(&self, pairs: &[RenamePair]) -> Result<RenameReport, MoverError> {
        self.calls.lock().unwrap().push(pairs.to_vec());

        let mut report = RenameReport::default();
        for pair in pairs {
            if self.failing.contains(&pair.from) {
                report.record_failure(pair.from.clone(), "permission denied");
            } else {
                report.record_success();
            }
        }
        Ok(report)
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

async fn engine_with(names: &[&str]) -> EngineHandle {
    let (engine, _worker) = engine::spawn("42");
    let entries = names
        .iter()
        .map(|n| NewEntry::new(PathBuf::from("/media").join(n), date(), MediaKind::Image))
        .collect();
    engine.init(entries).await.unwrap();
    engine
}

#[tokio::test]
async fn test_names_follow_tags_suffix_and_position() {
    let engine = engine_with(&["A.jpg", "B.jpg"]).await;
    let snapshot = engine.snapshot().await.unwrap();
    let (a, b) = (snapshot.entries[0].id, snapshot.entries[1].id);

    engine.set_tags(a, vec!["x".into()]).await.unwrap();
    let snapshot = engine.set_suffix(b, "v2").await.unwrap();

    assert_eq!(snapshot.entries[0].computed_name, "C42_x_20240102_1");
    assert_eq!(snapshot.entries[1].computed_name, "C42_NOTAGS_20240102_2_v2");
}

#[tokio::test]
async fn test_partial_failure_leaves_store_and_undo_untouched() {
    let engine = engine_with(&["IMG_1.jpg", "IMG_2.jpg", "IMG_3.jpg"]).await;
    let before = engine.snapshot().await.unwrap();
    let mover = Arc::new(ScriptedMover::failing(&["IMG_2.jpg"]));
    let controller = BatchController::new(mover.clone());

    let outcome = controller.apply(&engine).await.unwrap();

    let BatchOutcome::Failed { report, summary } = outcome else {
        panic!("expected a failed batch");
    };
    assert_eq!(report.error_count, 1);
    assert_eq!(summary.to_string(), "IMG_2.jpg");
    assert_eq!(engine.snapshot().await.unwrap().entries, before.entries);
    assert!(!controller.can_undo());
    assert_eq!(mover.calls()[0].len(), 3);
}

#[tokio::test]
async fn test_apply_then_undo_round_trip() {
    let engine = engine_with(&["IMG_1.jpg", "IMG_2.jpg"]).await;
    let snapshot = engine.snapshot().await.unwrap();
    let mut selection = SelectionModel::new();
    selection.apply(SelectionIntent::SelectAll, &snapshot.visible_ids());

    let mover = Arc::new(ScriptedMover::default());
    let controller = BatchController::new(mover.clone());

    let outcome = controller.apply(&engine).await.unwrap();
    assert_eq!(outcome, BatchOutcome::Completed { success_count: 2 });

    let after = engine.snapshot().await.unwrap();
    assert!(after.is_empty());
    selection.retain_existing(&[]);
    assert!(selection.is_empty());

    let ArmedHistory::Armed(pairs) = controller.history() else {
        panic!("history should be armed");
    };
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].from, PathBuf::from("/media/IMG_1.jpg"));
    assert_eq!(pairs[0].to, PathBuf::from("/media/C42_NOTAGS_20240102_1.jpg"));

    let undone = controller.undo().await.unwrap();
    assert_eq!(undone, BatchOutcome::Completed { success_count: 2 });
    assert!(!controller.can_undo());

    let undo_call = &mover.calls()[1];
    assert_eq!(undo_call[0], pairs[1].reversed());
    assert_eq!(undo_call[1], pairs[0].reversed());
}

#[tokio::test]
async fn test_filter_and_toggle_through_engine() {
    let engine = engine_with(&["beach.jpg", "Beach_2.jpg", "city.jpg"]).await;

    let snapshot = engine.set_filter("BEACH").await.unwrap();
    let ids = snapshot.visible_ids();
    assert_eq!(ids.len(), 2);

    let snapshot = engine.toggle_tag(ids.clone(), "EXT").await.unwrap();
    assert!(snapshot.entries[0].has_tag("EXT"));
    assert!(snapshot.entries[1].has_tag("EXT"));
    assert!(!snapshot.entries[2].has_tag("EXT"));

    let snapshot = engine.toggle_tag(ids, "EXT").await.unwrap();
    assert!(snapshot.entries.iter().all(|e| e.tags.is_empty()));
}

fn write(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, name.as_bytes()).unwrap();
    path
}

#[tokio::test]
async fn test_import_rename_and_undo_on_disk() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "one.jpg");
    write(dir.path(), "two.mp4");
    write(dir.path(), "notes.txt");

    let allowed = vec!["jpg".to_string(), "mp4".to_string()];
    let report = import::import(&[dir.path().to_path_buf()], false, &allowed).unwrap();
    assert_eq!(report.entries.len(), 2);

    let (engine, _worker) = engine::spawn("7");
    let snapshot = engine.init(report.entries).await.unwrap();
    for entry in &snapshot.entries {
        engine.set_capture_date(entry.id, date()).await.unwrap();
    }

    let controller = BatchController::new(Arc::new(FsMover));
    let outcome = controller.apply(&engine).await.unwrap();
    assert_eq!(outcome, BatchOutcome::Completed { success_count: 2 });

    let canonical = dir.path().canonicalize().unwrap();
    assert!(canonical.join("C7_NOTAGS_20240102_1.jpg").exists());
    assert!(canonical.join("C7_NOTAGS_20240102_2.mp4").exists());
    assert!(canonical.join("notes.txt").exists());

    let history = HistoryFile::in_dir(&dir.path().join("state"));
    history.store(&controller.history()).unwrap();
    let restored = BatchController::with_history(Arc::new(FsMover), history.load().unwrap());

    assert_eq!(restored.undo().await.unwrap(), BatchOutcome::Completed { success_count: 2 });
    assert!(canonical.join("one.jpg").exists());
    assert!(canonical.join("two.mp4").exists());
}

#[tokio::test]
async fn test_failure_summary_lists_five_then_counts() {
    let names: Vec<String> = (1..=7).map(|i| format!("f{i}.jpg")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let engine = engine_with(&refs).await;
    let controller = BatchController::new(Arc::new(ScriptedMover::failing(&refs)));

    let BatchOutcome::Failed { report, summary } = controller.apply(&engine).await.unwrap() else {
        panic!("expected failure");
    };
    assert_eq!(report.errors.len(), 7);
    assert_eq!(
        report.errors[0],
        RenameFailure { file: PathBuf::from("/media/f1.jpg"), reason: "permission denied".into() }
    );
    assert_eq!(summary.to_string(), "f1.jpg, f2.jpg, f3.jpg, f4.jpg, f5.jpg and 2 more...");
}
