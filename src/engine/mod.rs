//! Engine worker
//!
//! The [`EntryStore`] lives inside a single tokio task. Clients never touch
//! it directly: they post [`Command`]s over an unbounded channel and read the
//! [`Snapshot`] published on a watch channel after every command. Commands
//! are processed strictly one at a time in arrival order, so a reader can
//! only ever observe a fully recomputed snapshot.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::store::{EntryId, EntryStore, FieldUpdate, NewEntry, Snapshot};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine worker has stopped")]
    Closed,
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// A mutation (or read) processed by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init(Vec<NewEntry>),
    Append(Vec<NewEntry>),
    SetPrefix(String),
    UpdateField { id: EntryId, update: FieldUpdate },
    ToggleTag { ids: Vec<EntryId>, tag: String },
    Remove(Vec<EntryId>),
    ClearSuffix(Vec<EntryId>),
    ClearAll,
    SetFilter(String),
    /// Reply with the current snapshot without mutating
    Snapshot,
}

impl Command {
    const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Append(_) => "append",
            Self::SetPrefix(_) => "set_prefix",
            Self::UpdateField { .. } => "update_field",
            Self::ToggleTag { .. } => "toggle_tag",
            Self::Remove(_) => "remove",
            Self::ClearSuffix(_) => "clear_suffix",
            Self::ClearAll => "clear_all",
            Self::SetFilter(_) => "set_filter",
            Self::Snapshot => "snapshot",
        }
    }
}

struct Envelope {
    command: Command,
    reply: Option<oneshot::Sender<Arc<Snapshot>>>,
}

/// Cloneable client side of the engine
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<Envelope>,
    snapshots: watch::Receiver<Arc<Snapshot>>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("command", &self.command.name())
            .field("reply", &self.reply.is_some())
            .finish()
    }
}

/// Start the worker on the current tokio runtime.
///
/// The worker stops once every [`EngineHandle`] has been dropped.
#[must_use]
pub fn spawn(prefix_code: &str) -> (EngineHandle, JoinHandle<()>) {
    let store = EntryStore::new(prefix_code);
    let (commands, rx) = mpsc::unbounded_channel();
    let (publisher, snapshots) = watch::channel(Arc::new(store.snapshot()));

    let worker = tokio::spawn(run(store, rx, publisher));
    (EngineHandle { commands, snapshots }, worker)
}

async fn run(
    mut store: EntryStore,
    mut rx: mpsc::UnboundedReceiver<Envelope>,
    publisher: watch::Sender<Arc<Snapshot>>,
) {
    log::debug!("engine worker started");

    while let Some(Envelope { command, reply }) = rx.recv().await {
        let name = command.name();
        let mutated = execute(&mut store, command);

        let snapshot = if mutated {
            let snapshot = Arc::new(store.snapshot());
            publisher.send_replace(Arc::clone(&snapshot));
            log::trace!(
                "{name}: revision {} with {} entries",
                snapshot.revision,
                snapshot.entries.len()
            );
            snapshot
        } else {
            publisher.borrow().clone()
        };

        if let Some(reply) = reply {
            // The caller may have given up waiting; nothing to do then.
            let _ = reply.send(snapshot);
        }
    }

    log::debug!("engine worker stopped");
}

fn execute(store: &mut EntryStore, command: Command) -> bool {
    let before = store.revision();

    match command {
        Command::Init(entries) => store.init(entries),
        Command::Append(entries) => store.append(entries),
        Command::SetPrefix(code) => store.set_prefix(&code),
        Command::UpdateField { id, update } => {
            store.update_field(id, update);
        }
        Command::ToggleTag { ids, tag } => store.toggle_tag(&ids, &tag),
        Command::Remove(ids) => store.remove(&ids),
        Command::ClearSuffix(ids) => store.clear_suffix(&ids),
        Command::ClearAll => store.clear_all(),
        Command::SetFilter(term) => store.set_filter(&term),
        Command::Snapshot => {}
    }

    store.revision() != before
}

impl EngineHandle {
    /// Queue a command without waiting for it to be processed.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub fn post(&self, command: Command) -> Result<()> {
        self.commands
            .send(Envelope { command, reply: None })
            .map_err(|_| EngineError::Closed)
    }

    /// Queue a command and wait for the snapshot it produced.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn call(&self, command: Command) -> Result<Arc<Snapshot>> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Envelope { command, reply: Some(tx) })
            .map_err(|_| EngineError::Closed)?;
        rx.await.map_err(|_| EngineError::Closed)
    }

    /// Last published snapshot
    #[must_use]
    pub fn latest(&self) -> Arc<Snapshot> {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified whenever a new snapshot is published
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshots.clone()
    }

    /// Snapshot after every previously queued command has been processed
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.call(Command::Snapshot).await
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn init(&self, entries: Vec<NewEntry>) -> Result<Arc<Snapshot>> {
        self.call(Command::Init(entries)).await
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn append(&self, entries: Vec<NewEntry>) -> Result<Arc<Snapshot>> {
        self.call(Command::Append(entries)).await
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn set_prefix(&self, code: impl Into<String>) -> Result<Arc<Snapshot>> {
        self.call(Command::SetPrefix(code.into())).await
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn set_tags(&self, id: EntryId, tags: Vec<String>) -> Result<Arc<Snapshot>> {
        self.call(Command::UpdateField { id, update: FieldUpdate::Tags(tags) }).await
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn set_suffix(&self, id: EntryId, suffix: impl Into<String>) -> Result<Arc<Snapshot>> {
        self.call(Command::UpdateField { id, update: FieldUpdate::Suffix(suffix.into()) })
            .await
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn set_capture_date(&self, id: EntryId, date: NaiveDate) -> Result<Arc<Snapshot>> {
        self.call(Command::UpdateField { id, update: FieldUpdate::CaptureDate(date) })
            .await
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn toggle_tag(&self, ids: Vec<EntryId>, tag: impl Into<String>) -> Result<Arc<Snapshot>> {
        self.call(Command::ToggleTag { ids, tag: tag.into() }).await
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn remove(&self, ids: Vec<EntryId>) -> Result<Arc<Snapshot>> {
        self.call(Command::Remove(ids)).await
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn clear_suffix(&self, ids: Vec<EntryId>) -> Result<Arc<Snapshot>> {
        self.call(Command::ClearSuffix(ids)).await
    }

    /// # Errors
    ///
    /// Returns `EngineError::Closed` if the worker has stopped.
    pub async fn set_filter(&self, term: impl Into<String>) -> Result<Arc<Snapshot>> {
        self.call(Command::SetFilter(term.into())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MediaKind, Visible};
    use std::path::PathBuf;

    fn new_entry(name: &str) -> NewEntry {
        NewEntry::new(
            PathBuf::from("/media").join(name),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            MediaKind::Image,
        )
    }

    #[tokio::test]
    async fn test_call_returns_recomputed_snapshot() {
        let (engine, _worker) = spawn("42");
        let snap = engine.init(vec![new_entry("a.jpg"), new_entry("b.jpg")]).await.unwrap();

        let a = snap.entries[0].id;
        let b = snap.entries[1].id;
        engine.set_tags(a, vec!["x".into()]).await.unwrap();
        let snap = engine.set_suffix(b, "v2").await.unwrap();

        let names: Vec<&str> = snap.entries.iter().map(|e| e.computed_name.as_str()).collect();
        assert_eq!(names, vec!["C42_x_20240102_1", "C42_NOTAGS_20240102_2_v2"]);
    }

    #[tokio::test]
    async fn test_posts_are_processed_in_order() {
        let (engine, _worker) = spawn("");
        engine.post(Command::Init(vec![new_entry("a.jpg")])).unwrap();
        engine.post(Command::SetPrefix("1".into())).unwrap();
        engine.post(Command::SetPrefix("2".into())).unwrap();
        engine.post(Command::SetPrefix("3".into())).unwrap();

        let snap = engine.snapshot().await.unwrap();
        assert_eq!(snap.prefix(), "C3");
        assert_eq!(snap.entries[0].computed_name, "C3_NOTAGS_20240102");
        assert_eq!(engine.latest().revision, snap.revision);
    }

    #[tokio::test]
    async fn test_watch_receives_updates() {
        let (engine, _worker) = spawn("");
        let mut rx = engine.subscribe();
        engine.post(Command::Init(vec![new_entry("a.jpg")])).unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().entries.len(), 1);
    }

    #[tokio::test]
    async fn test_filter_publishes_visible_subset() {
        let (engine, _worker) = spawn("");
        engine.init(vec![new_entry("beach.jpg"), new_entry("forest.jpg")]).await.unwrap();
        let snap = engine.set_filter("FOR").await.unwrap();

        assert_eq!(snap.visible, Visible::Matching(vec![1]));
        assert_eq!(snap.visible_entry(0).unwrap().original_name, "forest.jpg");
    }

    #[tokio::test]
    async fn test_noop_does_not_bump_revision() {
        let (engine, _worker) = spawn("");
        let first = engine.init(vec![new_entry("a.jpg")]).await.unwrap();
        let second = engine.remove(Vec::new()).await.unwrap();
        assert_eq!(first.revision, second.revision);
    }

    #[tokio::test]
    async fn test_closed_after_worker_abort() {
        let (engine, worker) = spawn("");
        worker.abort();
        let _ = worker.await;
        assert!(matches!(engine.snapshot().await, Err(EngineError::Closed)));
        assert!(matches!(engine.post(Command::ClearAll), Err(EngineError::Closed)));
    }
}
