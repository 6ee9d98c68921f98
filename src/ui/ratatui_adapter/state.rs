//! Application state for the batch browser
//!
//! Holds the latest engine snapshot, the selection and its pending intent,
//! cursor and scroll positions, modal state, and the geometry recorded by
//! the last frame for mouse hit testing.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::selection::{IntentSlot, SelectionIntent, SelectionModel, DEBOUNCE_WINDOW};
use crate::store::{EntryId, FileEntry, Snapshot};
use crate::ui::output::MessageLevel;
use crate::ui::ratatui_adapter::widgets::{ColumnSpan, ConfirmDialogState, TextInputState};

/// How long a status message stays visible
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Current mode of the TUI application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Normal browsing mode
    #[default]
    Normal,
    /// Help overlay is visible
    Help,
    /// Text input modal is active
    Input,
    /// Confirmation dialog is active
    Confirm,
}

/// Pane receiving keyboard input in normal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,
    Tags,
}

/// What a submitted text input is used for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    Filter,
    Prefix,
    Import { replace: bool },
    Tags(Vec<EntryId>),
    CaptureDate(Vec<EntryId>),
    Suffix(Vec<EntryId>),
    TagSearch,
}

/// Action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Apply,
    ClearAll,
}

/// A status message with timestamp for TTL-based expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// Message level (success, error, warning, info)
    pub level: MessageLevel,
    /// Message text
    pub text: String,
    /// When the message was created
    pub created_at: Instant,
}

impl StatusMessage {
    /// Create a new status message
    #[must_use]
    pub fn new(level: MessageLevel, text: String) -> Self {
        Self {
            level,
            text,
            created_at: Instant::now(),
        }
    }

    /// Check if the message has expired based on TTL
    #[must_use]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Application state for the browser
#[derive(Debug)]
pub struct AppState {
    /// Latest snapshot published by the engine
    pub snapshot: Arc<Snapshot>,
    pub selection: SelectionModel,
    /// Latest selection intent waiting for the quiet window
    pub intents: IntentSlot,
    /// Cursor row in the visible list
    pub cursor: usize,
    /// Scroll offset for the table viewport
    pub scroll_offset: usize,
    /// Number of table rows visible in the viewport
    pub visible_height: usize,
    pub mode: Mode,
    pub focus: Focus,
    /// Catalog tag ids shown in the tag panel (after search)
    pub tag_ids: Vec<String>,
    pub tag_cursor: usize,
    pub tag_scroll: usize,
    pub tag_search: String,
    /// Description language for the tag panel
    pub language: String,
    /// Folder offered by the import prompt
    pub import_folder: Option<PathBuf>,
    /// Stored column widths
    pub column_sizes: BTreeMap<String, u16>,
    /// Status messages
    pub messages: Vec<StatusMessage>,
    /// Message TTL for auto-expiry
    pub message_ttl: Duration,
    /// Open text input and what it is for
    pub input: Option<(InputPurpose, TextInputState)>,
    /// Open confirmation and the action it guards
    pub confirm: Option<(ConfirmAction, ConfirmDialogState)>,
    /// An apply or undo is in flight
    pub busy: bool,
    /// The last batch can be undone
    pub can_undo: bool,
    /// Whether the user wants to leave
    pub should_exit: bool,
    /// Rows area of the table in the last frame
    pub table_area: Rect,
    /// Column spans of the table in the last frame
    pub columns: Vec<ColumnSpan>,
    /// Inner area of the tag panel in the last frame
    pub tag_area: Rect,
}

impl AppState {
    #[must_use]
    pub fn new(snapshot: Arc<Snapshot>, tag_ids: Vec<String>, language: impl Into<String>) -> Self {
        Self {
            snapshot,
            selection: SelectionModel::new(),
            intents: IntentSlot::new(DEBOUNCE_WINDOW),
            cursor: 0,
            scroll_offset: 0,
            visible_height: 20,
            mode: Mode::Normal,
            focus: Focus::Table,
            tag_ids,
            tag_cursor: 0,
            tag_scroll: 0,
            tag_search: String::new(),
            language: language.into(),
            import_folder: None,
            column_sizes: BTreeMap::new(),
            messages: Vec::new(),
            message_ttl: MESSAGE_TTL,
            input: None,
            confirm: None,
            busy: false,
            can_undo: false,
            should_exit: false,
            table_area: Rect::default(),
            columns: Vec::new(),
            tag_area: Rect::default(),
        }
    }

    #[must_use]
    pub fn with_column_sizes(mut self, sizes: BTreeMap<String, u16>) -> Self {
        self.column_sizes = sizes;
        self
    }

    /// Adopt a newer snapshot, dropping selected ids that no longer exist.
    ///
    /// Returns whether the snapshot changed.
    pub fn sync_snapshot(&mut self, snapshot: Arc<Snapshot>) -> bool {
        if snapshot.revision == self.snapshot.revision {
            return false;
        }

        self.snapshot = snapshot;
        let existing: Vec<EntryId> = self.snapshot.entries.iter().map(|e| e.id).collect();
        self.selection.retain_existing(&existing);
        self.clamp_cursor();
        true
    }

    /// Queue a selection intent; only the latest one is committed.
    pub fn push_intent(&mut self, intent: SelectionIntent, now: Instant) {
        self.intents.push(intent, now);
    }

    /// Commit the pending intent once its quiet window has passed.
    pub fn commit_due(&mut self, now: Instant) -> bool {
        match self.intents.take_due(now) {
            Some(intent) => {
                self.commit(intent);
                true
            }
            None => false,
        }
    }

    /// Commit the pending intent immediately
    pub fn flush_intents(&mut self) {
        if let Some(intent) = self.intents.flush() {
            self.commit(intent);
        }
    }

    /// Apply an intent against the current snapshot and selection
    pub fn commit(&mut self, intent: SelectionIntent) {
        let visible = self.snapshot.visible_ids();
        self.selection.apply(intent, &visible);

        // clicks keep the cursor on the clicked row, arrows follow the anchor
        let focus = match intent {
            SelectionIntent::Click(id)
            | SelectionIntent::CtrlClick(id)
            | SelectionIntent::ShiftClick(id) => Some(id),
            SelectionIntent::Step(_) | SelectionIntent::Extend(_) => self.selection.anchor(),
            SelectionIntent::SelectAll | SelectionIntent::Clear => None,
        };
        if let Some(row) = focus.and_then(|id| visible.iter().position(|v| *v == id)) {
            self.cursor = row;
            self.adjust_scroll();
        }
    }

    /// Selected ids in display order, after committing any pending intent
    pub fn targets(&mut self) -> Vec<EntryId> {
        self.flush_intents();
        self.selection.in_visible_order(&self.snapshot.visible_ids())
    }

    /// Selected entries (visible or not)
    #[must_use]
    pub fn selected_entries(&self) -> Vec<&FileEntry> {
        self.selection
            .selected()
            .iter()
            .filter_map(|id| self.snapshot.get(*id))
            .collect()
    }

    /// Entry under the cursor
    #[must_use]
    pub fn cursor_entry(&self) -> Option<&FileEntry> {
        self.snapshot.visible_entry(self.cursor)
    }

    #[must_use]
    pub fn cursor_id(&self) -> Option<EntryId> {
        self.cursor_entry().map(|e| e.id)
    }

    /// Move cursor up
    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.adjust_scroll();
        }
    }

    /// Move cursor down
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.snapshot.visible_len() {
            self.cursor += 1;
            self.adjust_scroll();
        }
    }

    /// Move cursor up by one page
    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.visible_height);
        self.adjust_scroll();
    }

    /// Move cursor down by one page
    pub fn page_down(&mut self) {
        let max_cursor = self.snapshot.visible_len().saturating_sub(1);
        self.cursor = (self.cursor + self.visible_height).min(max_cursor);
        self.adjust_scroll();
    }

    pub fn jump_to_start(&mut self) {
        self.cursor = 0;
        self.adjust_scroll();
    }

    pub fn jump_to_end(&mut self) {
        self.cursor = self.snapshot.visible_len().saturating_sub(1);
        self.adjust_scroll();
    }

    /// Place the cursor on a visible row
    pub fn set_cursor(&mut self, row: usize) {
        if row < self.snapshot.visible_len() {
            self.cursor = row;
            self.adjust_scroll();
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.snapshot.visible_len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
        self.adjust_scroll();
    }

    /// Adjust scroll offset to keep cursor visible
    pub fn adjust_scroll(&mut self) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.visible_height > 0 && self.cursor >= self.scroll_offset + self.visible_height {
            self.scroll_offset = self.cursor + 1 - self.visible_height;
        }

        let max_offset = self.snapshot.visible_len().saturating_sub(self.visible_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Replace the tag list shown in the panel
    pub fn set_tag_ids(&mut self, ids: Vec<String>) {
        self.tag_ids = ids;
        self.tag_cursor = self.tag_cursor.min(self.tag_ids.len().saturating_sub(1));
        self.tag_scroll = self.tag_scroll.min(self.tag_cursor);
    }

    pub fn tag_cursor_up(&mut self) {
        if self.tag_cursor > 0 {
            self.tag_cursor -= 1;
            self.tag_scroll = self.tag_scroll.min(self.tag_cursor);
        }
    }

    pub fn tag_cursor_down(&mut self) {
        if self.tag_cursor + 1 < self.tag_ids.len() {
            self.tag_cursor += 1;
            let height = self.tag_area.height as usize;
            if height > 0 && self.tag_cursor >= self.tag_scroll + height {
                self.tag_scroll = self.tag_cursor + 1 - height;
            }
        }
    }

    /// Tag under the tag panel cursor
    #[must_use]
    pub fn current_tag(&self) -> Option<&str> {
        self.tag_ids.get(self.tag_cursor).map(String::as_str)
    }

    /// Add a status message
    pub fn add_message(&mut self, level: MessageLevel, text: impl Into<String>) {
        self.messages.push(StatusMessage::new(level, text.into()));
    }

    /// Messages that have not expired
    #[must_use]
    pub fn active_messages(&self) -> Vec<&StatusMessage> {
        self.messages
            .iter()
            .filter(|m| !m.is_expired(self.message_ttl))
            .collect()
    }

    /// Drop expired messages
    pub fn cleanup_messages(&mut self) {
        let ttl = self.message_ttl;
        self.messages.retain(|m| !m.is_expired(ttl));
    }

    pub fn open_input(&mut self, purpose: InputPurpose, input: TextInputState) {
        self.input = Some((purpose, input));
        self.mode = Mode::Input;
    }

    pub fn close_input(&mut self) -> Option<(InputPurpose, TextInputState)> {
        self.mode = Mode::Normal;
        self.input.take()
    }

    pub fn open_confirm(&mut self, action: ConfirmAction, dialog: ConfirmDialogState) {
        self.confirm = Some((action, dialog));
        self.mode = Mode::Confirm;
    }

    pub fn close_confirm(&mut self) -> Option<(ConfirmAction, ConfirmDialogState)> {
        self.mode = Mode::Normal;
        self.confirm.take()
    }
}
