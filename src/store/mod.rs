//! Entry store
//!
//! The authoritative, ordered list of imported files together with the
//! batch-wide prefix code and filter term. Every mutation recomputes the
//! derived names of all entries before returning, so a [`Snapshot`] never
//! carries a stale name.

mod filter;

pub use filter::{Visible, visible};

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::naming;
use crate::tags;

/// Stable identifier of an entry, never reused within a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Media family of an entry, used for preview only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// One imported file and its editable metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: EntryId,
    pub source_path: PathBuf,
    pub original_name: String,
    pub computed_name: String,
    /// Insertion-ordered, no duplicates
    pub tags: Vec<String>,
    pub capture_date: NaiveDate,
    pub suffix: String,
    pub kind: MediaKind,
}

impl FileEntry {
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Full path this entry is renamed to on apply
    #[must_use]
    pub fn target_path(&self) -> PathBuf {
        naming::target_path(&self.source_path, &self.computed_name)
    }
}

/// Importer output, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub source_path: PathBuf,
    pub capture_date: NaiveDate,
    pub kind: MediaKind,
}

impl NewEntry {
    #[must_use]
    pub const fn new(source_path: PathBuf, capture_date: NaiveDate, kind: MediaKind) -> Self {
        Self { source_path, capture_date, kind }
    }
}

/// A single-field edit applied through [`EntryStore::update_field`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Tags(Vec<String>),
    Suffix(String),
    CaptureDate(NaiveDate),
}

/// Immutable view of the store published after every mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub revision: u64,
    pub entries: Vec<FileEntry>,
    pub visible: Visible,
    pub prefix_code: String,
    pub filter: String,
}

impl Snapshot {
    /// Effective prefix (`C` + code)
    #[must_use]
    pub fn prefix(&self) -> String {
        naming::prefix_for(&self.prefix_code)
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len(self.entries.len())
    }

    /// Entry displayed at a visible row
    #[must_use]
    pub fn visible_entry(&self, row: usize) -> Option<&FileEntry> {
        self.visible
            .entry_index(row, self.entries.len())
            .and_then(|i| self.entries.get(i))
    }

    /// Visible entries in display order
    pub fn visible_entries(&self) -> impl Iterator<Item = &FileEntry> + '_ {
        (0..self.visible_len()).filter_map(move |row| self.visible_entry(row))
    }

    /// Ids of the visible entries in display order
    #[must_use]
    pub fn visible_ids(&self) -> Vec<EntryId> {
        self.visible_entries().map(|e| e.id).collect()
    }

    /// Visible row of an entry, if it passes the filter
    #[must_use]
    pub fn visible_row(&self, id: EntryId) -> Option<usize> {
        self.visible_entries().position(|e| e.id == id)
    }

    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owner of the entry list; lives inside the engine worker
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<FileEntry>,
    prefix_code: String,
    filter: String,
    next_id: u64,
    revision: u64,
}

impl EntryStore {
    /// Create an empty store with an initial prefix code
    #[must_use]
    pub fn new(prefix_code: &str) -> Self {
        Self {
            prefix_code: naming::sanitize_code(prefix_code),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    #[must_use]
    pub fn prefix_code(&self) -> &str {
        &self.prefix_code
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the whole store. The filter term is reset.
    pub fn init(&mut self, entries: Vec<NewEntry>) {
        self.entries = entries.into_iter().map(|e| self.assign(e)).collect();
        self.filter.clear();
        self.recompute();
    }

    /// Add entries after the existing ones, keeping the filter term.
    pub fn append(&mut self, entries: Vec<NewEntry>) {
        let assigned: Vec<FileEntry> = entries.into_iter().map(|e| self.assign(e)).collect();
        self.entries.extend(assigned);
        self.recompute();
    }

    pub fn set_prefix(&mut self, code: &str) {
        self.prefix_code = naming::sanitize_code(code);
        self.recompute();
    }

    /// Edit one field of one entry. Returns `false` for an unknown id.
    pub fn update_field(&mut self, id: EntryId, update: FieldUpdate) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };

        match update {
            FieldUpdate::Tags(tags) => entry.tags = dedup_tags(tags),
            FieldUpdate::Suffix(suffix) => entry.suffix = naming::sanitize_suffix(&suffix),
            FieldUpdate::CaptureDate(date) => entry.capture_date = date,
        }

        self.recompute();
        true
    }

    /// Tri-state tag toggle over a selection.
    pub fn toggle_tag(&mut self, ids: &[EntryId], tag: &str) {
        let tag = naming::sanitize_tag(tag);
        if ids.is_empty() || tag.is_empty() {
            return;
        }

        tags::toggle(&mut self.entries, ids, &tag);
        self.recompute();
    }

    pub fn remove(&mut self, ids: &[EntryId]) {
        if ids.is_empty() {
            return;
        }

        self.entries.retain(|e| !ids.contains(&e.id));
        self.recompute();
    }

    pub fn clear_suffix(&mut self, ids: &[EntryId]) {
        if ids.is_empty() {
            return;
        }

        for entry in self.entries.iter_mut().filter(|e| ids.contains(&e.id)) {
            entry.suffix.clear();
        }
        self.recompute();
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.recompute();
    }

    /// Change the filter term. Names are left alone.
    pub fn set_filter(&mut self, term: &str) {
        self.filter = term.to_string();
        self.revision += 1;
    }

    /// Build the published view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            entries: self.entries.clone(),
            visible: visible(&self.entries, &self.filter),
            prefix_code: self.prefix_code.clone(),
            filter: self.filter.clone(),
        }
    }

    fn assign(&mut self, new: NewEntry) -> FileEntry {
        self.next_id += 1;
        FileEntry {
            id: EntryId(self.next_id),
            original_name: file_name(&new.source_path),
            source_path: new.source_path,
            computed_name: String::new(),
            tags: Vec::new(),
            capture_date: new.capture_date,
            suffix: String::new(),
            kind: new.kind,
        }
    }

    fn recompute(&mut self) {
        let prefix = naming::prefix_for(&self.prefix_code);
        let total = self.entries.len();

        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.computed_name = naming::compute_name(
                &prefix,
                &entry.tags,
                entry.capture_date,
                &entry.suffix,
                index,
                total,
            );
        }

        self.revision += 1;
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = naming::sanitize_tag(&tag);
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
pub(crate) fn test_entry(id: u64, name: &str) -> FileEntry {
    FileEntry {
        id: EntryId(id),
        source_path: PathBuf::from("/media").join(name),
        original_name: name.to_string(),
        computed_name: String::new(),
        tags: Vec::new(),
        capture_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        suffix: String::new(),
        kind: MediaKind::Image,
    }
}
