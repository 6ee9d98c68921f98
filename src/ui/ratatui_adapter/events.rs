//! Event handling for the batch browser
//!
//! Translates keyboard and mouse events into state changes. Selection
//! changes are queued as intents; everything that needs the engine, the
//! filesystem or the batch controller is returned to the runner as an
//! [`EventResult`].

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Position;

use crate::engine::Command;
use crate::selection::{ClickRoute, Control, Direction, Node, SelectionIntent, route};
use crate::store::{EntryId, FieldUpdate};
use crate::ui::output::MessageLevel;
use crate::ui::ratatui_adapter::state::{AppState, ConfirmAction, Focus, InputPurpose, Mode};
use crate::ui::ratatui_adapter::widgets::{Column, ConfirmDialogState, TextInputState};

const COLUMN_STEP: u16 = 2;
const MIN_NAME_WIDTH: u16 = 8;
const MAX_NAME_WIDTH: u16 = 80;

/// Result of handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Continue running, state may have changed
    Continue,
    /// Event was not handled
    Ignored,
    /// Exit the application
    Quit,
    /// Post these commands to the engine
    Post(Vec<Command>),
    /// Change and remember the prefix code
    SetPrefix(String),
    /// Import files from a path
    Import { path: PathBuf, replace: bool },
    /// Narrow the tag panel to tags matching the term
    SearchTags(String),
    /// Column widths changed and should be saved
    ColumnsChanged,
    /// Start the rename batch
    Apply,
    /// Revert the last batch
    Undo,
}

/// Parse a capture date typed by the user
#[must_use]
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y%m%d"))
        .ok()
}

/// Handle a key event in normal mode
pub fn handle_normal_mode(state: &mut AppState, key: KeyEvent, now: Instant) -> EventResult {
    match state.focus {
        Focus::Table => handle_table_keys(state, key, now),
        Focus::Tags => handle_tag_keys(state, key),
    }
}

fn handle_table_keys(state: &mut AppState, key: KeyEvent, now: Instant) -> EventResult {
    match (key.code, key.modifiers) {
        (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
            state.push_intent(SelectionIntent::SelectAll, now);
            EventResult::Continue
        }
        (KeyCode::Up, m) if m.contains(KeyModifiers::SHIFT) => {
            state.push_intent(SelectionIntent::Extend(Direction::Up), now);
            EventResult::Continue
        }
        (KeyCode::Down, m) if m.contains(KeyModifiers::SHIFT) => {
            state.push_intent(SelectionIntent::Extend(Direction::Down), now);
            EventResult::Continue
        }
        (KeyCode::Up, _) => {
            state.push_intent(SelectionIntent::Step(Direction::Up), now);
            EventResult::Continue
        }
        (KeyCode::Down, _) => {
            state.push_intent(SelectionIntent::Step(Direction::Down), now);
            EventResult::Continue
        }
        (KeyCode::Char('k'), _) => {
            state.cursor_up();
            EventResult::Continue
        }
        (KeyCode::Char('j'), _) => {
            state.cursor_down();
            EventResult::Continue
        }
        (KeyCode::PageUp, _) => {
            state.page_up();
            EventResult::Continue
        }
        (KeyCode::PageDown, _) => {
            state.page_down();
            EventResult::Continue
        }
        (KeyCode::Home, _) => {
            state.jump_to_start();
            EventResult::Continue
        }
        (KeyCode::End, _) => {
            state.jump_to_end();
            EventResult::Continue
        }
        (KeyCode::Enter, _) => push_at_cursor(state, SelectionIntent::Click, now),
        (KeyCode::Char(' '), _) => push_at_cursor(state, SelectionIntent::CtrlClick, now),
        (KeyCode::Char('v'), _) => push_at_cursor(state, SelectionIntent::ShiftClick, now),
        (KeyCode::Esc, _) => {
            if state.selection.is_empty() && !state.intents.is_pending() {
                request_quit(state)
            } else {
                state.push_intent(SelectionIntent::Clear, now);
                EventResult::Continue
            }
        }
        (KeyCode::Tab, _) => {
            state.focus = Focus::Tags;
            EventResult::Continue
        }
        (KeyCode::Char('/'), _) => {
            let current = state.snapshot.filter.clone();
            state.open_input(InputPurpose::Filter, TextInputState::new("Filter by name", current));
            EventResult::Continue
        }
        (KeyCode::Char('p'), _) => {
            let current = state.snapshot.prefix_code.clone();
            state.open_input(InputPurpose::Prefix, TextInputState::new("Prefix code", current));
            EventResult::Continue
        }
        (KeyCode::Char('t'), _) => edit_selection(state, Control::Tags),
        (KeyCode::Char('d'), _) => edit_selection(state, Control::CaptureDate),
        (KeyCode::Char('s'), _) => edit_selection(state, Control::Suffix),
        (KeyCode::Char('x'), _) => with_targets(state, |ids| vec![Command::ClearSuffix(ids)]),
        (KeyCode::Delete, _) => with_targets(state, |ids| vec![Command::Remove(ids)]),
        (KeyCode::Char('C'), _) => {
            if state.snapshot.is_empty() {
                return EventResult::Continue;
            }
            let dialog = ConfirmDialogState::new(
                "Clear",
                format!("Discard all {} file(s) from the batch?", state.snapshot.entries.len()),
            );
            state.open_confirm(ConfirmAction::ClearAll, dialog);
            EventResult::Continue
        }
        (KeyCode::Char('i'), _) => open_import(state, false),
        (KeyCode::Char('I'), _) => open_import(state, true),
        (KeyCode::Char('a'), _) => request_apply(state),
        (KeyCode::Char('u'), _) => request_undo(state),
        (KeyCode::Char('<'), _) => resize_name_column(state, false),
        (KeyCode::Char('>'), _) => resize_name_column(state, true),
        (KeyCode::Char('?') | KeyCode::F(1), _) => {
            state.mode = Mode::Help;
            EventResult::Continue
        }
        (KeyCode::Char('q'), _) => request_quit(state),
        _ => EventResult::Ignored,
    }
}

fn handle_tag_keys(state: &mut AppState, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.tag_cursor_up();
            EventResult::Continue
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.tag_cursor_down();
            EventResult::Continue
        }
        KeyCode::Char(' ') | KeyCode::Enter => toggle_current_tag(state),
        KeyCode::Char('/') => {
            let current = state.tag_search.clone();
            state.open_input(InputPurpose::TagSearch, TextInputState::new("Search tags", current));
            EventResult::Continue
        }
        KeyCode::Tab | KeyCode::Esc => {
            state.focus = Focus::Table;
            EventResult::Continue
        }
        KeyCode::Char('?') | KeyCode::F(1) => {
            state.mode = Mode::Help;
            EventResult::Continue
        }
        KeyCode::Char('q') => request_quit(state),
        _ => EventResult::Ignored,
    }
}

fn push_at_cursor(
    state: &mut AppState,
    intent: fn(EntryId) -> SelectionIntent,
    now: Instant,
) -> EventResult {
    match state.cursor_id() {
        Some(id) => {
            state.push_intent(intent(id), now);
            EventResult::Continue
        }
        None => EventResult::Ignored,
    }
}

fn request_quit(state: &mut AppState) -> EventResult {
    if state.busy {
        state.add_message(MessageLevel::Warning, "Wait for the running batch to finish");
        return EventResult::Continue;
    }
    state.should_exit = true;
    EventResult::Quit
}

/// Run `build` on the selected ids, or warn when nothing is selected
fn with_targets(state: &mut AppState, build: impl FnOnce(Vec<EntryId>) -> Vec<Command>) -> EventResult {
    let ids = state.targets();
    if ids.is_empty() {
        state.add_message(MessageLevel::Warning, "No files selected");
        return EventResult::Continue;
    }
    EventResult::Post(build(ids))
}

fn toggle_current_tag(state: &mut AppState) -> EventResult {
    let Some(tag) = state.current_tag().map(String::from) else {
        return EventResult::Ignored;
    };
    with_targets(state, |ids| vec![Command::ToggleTag { ids, tag }])
}

fn edit_selection(state: &mut AppState, control: Control) -> EventResult {
    let ids = state.targets();
    if ids.is_empty() {
        state.add_message(MessageLevel::Warning, "No files selected");
        return EventResult::Continue;
    }
    open_editor(state, control, ids);
    EventResult::Continue
}

/// Open the editor of a row control, prefilled from the first target
fn open_editor(state: &mut AppState, control: Control, ids: Vec<EntryId>) {
    let first = ids.first().and_then(|id| state.snapshot.get(*id));
    let count = ids.len();
    let noun = if count == 1 { "file".to_string() } else { format!("{count} files") };

    let (purpose, input) = match control {
        Control::Tags => {
            let current = first.map(|e| e.tags.join(" ")).unwrap_or_default();
            let input = TextInputState::new(format!("Tags for {noun}"), current)
                .with_autocomplete(state.tag_ids.clone());
            (InputPurpose::Tags(ids), input)
        }
        Control::CaptureDate => {
            let current = first
                .map(|e| e.capture_date.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let input = TextInputState::new(format!("Capture date for {noun} (YYYY-MM-DD)"), current);
            (InputPurpose::CaptureDate(ids), input)
        }
        Control::Suffix => {
            let current = first.map(|e| e.suffix.clone()).unwrap_or_default();
            (InputPurpose::Suffix(ids), TextInputState::new(format!("Suffix for {noun}"), current))
        }
    };

    state.open_input(purpose, input);
}

fn open_import(state: &mut AppState, replace: bool) -> EventResult {
    let current = state
        .import_folder
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let prompt = if replace { "Replace batch with files from" } else { "Import files from" };
    state.open_input(InputPurpose::Import { replace }, TextInputState::new(prompt, current));
    EventResult::Continue
}

fn request_apply(state: &mut AppState) -> EventResult {
    if state.busy {
        state.add_message(MessageLevel::Warning, "A batch is already running");
        return EventResult::Continue;
    }
    if state.snapshot.is_empty() {
        state.add_message(MessageLevel::Info, "Nothing to rename");
        return EventResult::Continue;
    }

    let context = state
        .snapshot
        .entries
        .iter()
        .map(|e| {
            let target = e.target_path();
            let name = target.file_name().map_or_else(String::new, |n| n.to_string_lossy().into_owned());
            format!("{} -> {name}", e.original_name)
        })
        .collect();
    let dialog = ConfirmDialogState::new(
        "Apply",
        format!("Rename {} file(s) on disk?", state.snapshot.entries.len()),
    )
    .with_context(context);
    state.open_confirm(ConfirmAction::Apply, dialog);
    EventResult::Continue
}

fn request_undo(state: &mut AppState) -> EventResult {
    if state.busy {
        state.add_message(MessageLevel::Warning, "A batch is already running");
        EventResult::Continue
    } else if !state.can_undo {
        state.add_message(MessageLevel::Info, "Nothing to undo");
        EventResult::Continue
    } else {
        EventResult::Undo
    }
}

fn resize_name_column(state: &mut AppState, wider: bool) -> EventResult {
    let key = Column::Name.key();
    let current = state
        .column_sizes
        .get(key)
        .copied()
        .unwrap_or_else(|| Column::Name.default_width());
    let next = if wider {
        current.saturating_add(COLUMN_STEP)
    } else {
        current.saturating_sub(COLUMN_STEP)
    }
    .clamp(MIN_NAME_WIDTH, MAX_NAME_WIDTH);

    if next == current {
        return EventResult::Continue;
    }
    state.column_sizes.insert(key.to_string(), next);
    EventResult::ColumnsChanged
}

/// Handle keys while the help overlay is shown
pub const fn handle_help_mode(state: &mut AppState, _key: KeyEvent) -> EventResult {
    state.mode = Mode::Normal;
    EventResult::Continue
}

/// Handle keys while the text input modal is open
pub fn handle_input_mode(state: &mut AppState, key: KeyEvent) -> EventResult {
    let Some((_, input)) = state.input.as_mut() else {
        state.mode = Mode::Normal;
        return EventResult::Ignored;
    };

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            state.close_input();
            return EventResult::Continue;
        }
        (KeyCode::Enter, _) => return submit_input(state),
        (KeyCode::Tab, _) => input.accept_suggestion(),
        (KeyCode::Up, _) => input.suggestion_up(),
        (KeyCode::Down, _) => input.suggestion_down(),
        (KeyCode::Backspace, _) => input.backspace(),
        (KeyCode::Delete, _) => input.delete(),
        (KeyCode::Left, _) => input.cursor_left(),
        (KeyCode::Right, _) => input.cursor_right(),
        (KeyCode::Home, _) => input.cursor_home(),
        (KeyCode::End, _) => input.cursor_end(),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => input.clear_line(),
        (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => input.insert_char(c),
        _ => return EventResult::Ignored,
    }

    EventResult::Continue
}

fn submit_input(state: &mut AppState) -> EventResult {
    let Some((purpose, input)) = state.close_input() else {
        return EventResult::Ignored;
    };
    let text = input.text().trim().to_string();

    match purpose {
        InputPurpose::Filter => {
            state.jump_to_start();
            EventResult::Post(vec![Command::SetFilter(text)])
        }
        InputPurpose::Prefix => EventResult::SetPrefix(text),
        InputPurpose::Import { replace } => {
            if text.is_empty() {
                return EventResult::Continue;
            }
            EventResult::Import {
                path: PathBuf::from(text),
                replace,
            }
        }
        InputPurpose::Tags(ids) => {
            let tags = input.values();
            EventResult::Post(
                ids.into_iter()
                    .map(|id| Command::UpdateField {
                        id,
                        update: FieldUpdate::Tags(tags.clone()),
                    })
                    .collect(),
            )
        }
        InputPurpose::CaptureDate(ids) => match parse_date(&text) {
            Some(date) => EventResult::Post(
                ids.into_iter()
                    .map(|id| Command::UpdateField {
                        id,
                        update: FieldUpdate::CaptureDate(date),
                    })
                    .collect(),
            ),
            None => {
                state.add_message(
                    MessageLevel::Error,
                    format!("Invalid date '{text}' (expected YYYY-MM-DD)"),
                );
                EventResult::Continue
            }
        },
        InputPurpose::Suffix(ids) => EventResult::Post(
            ids.into_iter()
                .map(|id| Command::UpdateField {
                    id,
                    update: FieldUpdate::Suffix(text.clone()),
                })
                .collect(),
        ),
        InputPurpose::TagSearch => {
            state.tag_search.clone_from(&text);
            EventResult::SearchTags(text)
        }
    }
}

/// Handle keys while a confirmation dialog is open
pub fn handle_confirm_mode(state: &mut AppState, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => match state.close_confirm() {
            Some((ConfirmAction::Apply, _)) => EventResult::Apply,
            Some((ConfirmAction::ClearAll, _)) => {
                state.selection.clear();
                state.intents.flush();
                EventResult::Post(vec![Command::ClearAll])
            }
            None => EventResult::Ignored,
        },
        KeyCode::Char('n' | 'N') | KeyCode::Esc => {
            state.close_confirm();
            EventResult::Continue
        }
        _ => EventResult::Ignored,
    }
}

/// Path from the node under the pointer up to its row.
///
/// Empty when the pointer is outside the rows of the table.
#[must_use]
pub fn hit_path(state: &AppState, x: u16, y: u16) -> Vec<Node> {
    let area = state.table_area;
    if !area.contains(Position::new(x, y)) {
        return Vec::new();
    }

    let row = state.scroll_offset + usize::from(y - area.y);
    if row >= state.snapshot.visible_len() {
        return Vec::new();
    }

    let cell = state
        .columns
        .iter()
        .find(|span| span.contains(x))
        .and_then(|span| span.column.control())
        .map_or(Node::Inert, Node::Interactive);

    vec![cell, Node::Row(row)]
}

fn click_intent(modifiers: KeyModifiers, id: EntryId) -> SelectionIntent {
    if modifiers.contains(KeyModifiers::CONTROL) {
        SelectionIntent::CtrlClick(id)
    } else if modifiers.contains(KeyModifiers::SHIFT) {
        SelectionIntent::ShiftClick(id)
    } else {
        SelectionIntent::Click(id)
    }
}

fn handle_left_click(state: &mut AppState, mouse: MouseEvent, now: Instant) -> EventResult {
    if state.tag_area.contains(Position::new(mouse.column, mouse.row)) {
        let index = state.tag_scroll + usize::from(mouse.row - state.tag_area.y);
        if index >= state.tag_ids.len() {
            return EventResult::Ignored;
        }
        state.focus = Focus::Tags;
        state.tag_cursor = index;
        return toggle_current_tag(state);
    }

    match route(&hit_path(state, mouse.column, mouse.row)) {
        ClickRoute::Row(row) => {
            let Some(id) = state.snapshot.visible_entry(row).map(|e| e.id) else {
                return EventResult::Ignored;
            };
            state.focus = Focus::Table;
            state.push_intent(click_intent(mouse.modifiers, id), now);
            EventResult::Continue
        }
        ClickRoute::Control { row, control } => {
            let Some(id) = state.snapshot.visible_entry(row).map(|e| e.id) else {
                return EventResult::Ignored;
            };
            open_editor(state, control, vec![id]);
            EventResult::Continue
        }
        ClickRoute::Ignored => EventResult::Ignored,
    }
}

/// Handle mouse events
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) -> EventResult {
    if state.mode != Mode::Normal {
        return EventResult::Ignored;
    }

    let over_tags = state.tag_area.contains(Position::new(mouse.column, mouse.row));
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_left_click(state, mouse, now),
        MouseEventKind::ScrollUp if over_tags => {
            state.tag_cursor_up();
            EventResult::Continue
        }
        MouseEventKind::ScrollDown if over_tags => {
            state.tag_cursor_down();
            EventResult::Continue
        }
        MouseEventKind::ScrollUp => {
            state.cursor_up();
            EventResult::Continue
        }
        MouseEventKind::ScrollDown => {
            state.cursor_down();
            EventResult::Continue
        }
        _ => EventResult::Ignored,
    }
}

/// Dispatch one terminal event according to the current mode
pub fn handle_event(state: &mut AppState, event: Event, now: Instant) -> EventResult {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match state.mode {
            Mode::Normal => handle_normal_mode(state, key, now),
            Mode::Help => handle_help_mode(state, key),
            Mode::Input => handle_input_mode(state, key),
            Mode::Confirm => handle_confirm_mode(state, key),
        },
        Event::Mouse(mouse) => handle_mouse(state, mouse, now),
        Event::Resize(_, _) => EventResult::Continue,
        _ => EventResult::Ignored,
    }
}

/// Poll for events and handle them
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn poll_and_handle(state: &mut AppState, timeout: Duration) -> std::io::Result<EventResult> {
    if !event::poll(timeout)? {
        return Ok(EventResult::Continue);
    }

    let event = event::read()?;
    Ok(handle_event(state, event, Instant::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::DEBOUNCE_WINDOW;
    use crate::store::{Snapshot, Visible, test_entry};
    use crate::ui::ratatui_adapter::widgets::layout_columns;
    use ratatui::layout::Rect;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn make_state() -> AppState {
        let snapshot = Snapshot {
            revision: 1,
            entries: (1..=5).map(|i| test_entry(i, &format!("f{i}.jpg"))).collect(),
            visible: Visible::All,
            prefix_code: "1".into(),
            filter: String::new(),
        };
        let mut state = AppState::new(Arc::new(snapshot), vec!["EXT".into(), "INT".into()], "en");
        state.table_area = Rect::new(1, 2, 118, 10);
        state.columns = layout_columns(Rect::new(1, 1, 118, 11), &BTreeMap::new());
        state.tag_area = Rect::new(121, 1, 30, 10);
        state
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(x: u16, y: u16, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers,
        }
    }

    fn settle(state: &mut AppState, now: Instant) {
        state.commit_due(now + DEBOUNCE_WINDOW);
    }

    fn ids(raw: &[u64]) -> Vec<EntryId> {
        raw.iter().map(|i| EntryId::new(*i)).collect()
    }

    #[test]
    fn test_arrow_keys_select_through_the_slot() {
        let mut state = make_state();
        let now = Instant::now();

        handle_normal_mode(&mut state, key(KeyCode::Down), now);
        assert!(state.selection.is_empty());
        settle(&mut state, now);
        assert_eq!(state.selection.selected(), ids(&[1]).as_slice());

        let shift_down = KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT);
        handle_normal_mode(&mut state, shift_down, now);
        settle(&mut state, now);
        assert_eq!(state.selection.selected(), ids(&[1, 2]).as_slice());
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_rapid_intents_keep_only_latest() {
        let mut state = make_state();
        let now = Instant::now();

        handle_normal_mode(&mut state, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL), now);
        handle_normal_mode(&mut state, key(KeyCode::Enter), now);
        settle(&mut state, now);

        assert_eq!(state.selection.selected(), ids(&[1]).as_slice());
    }

    #[test]
    fn test_space_and_v_at_cursor() {
        let mut state = make_state();
        let now = Instant::now();

        handle_normal_mode(&mut state, key(KeyCode::Enter), now);
        settle(&mut state, now);
        handle_normal_mode(&mut state, key(KeyCode::Char('j')), now);
        handle_normal_mode(&mut state, key(KeyCode::Char('j')), now);
        handle_normal_mode(&mut state, key(KeyCode::Char('v')), now);
        settle(&mut state, now);
        assert_eq!(state.selection.selected(), ids(&[1, 2, 3]).as_slice());

        handle_normal_mode(&mut state, key(KeyCode::Char(' ')), now);
        settle(&mut state, now);
        assert_eq!(state.selection.selected(), ids(&[1, 2]).as_slice());
    }

    #[test]
    fn test_actions_need_a_selection() {
        let mut state = make_state();
        let result = handle_normal_mode(&mut state, key(KeyCode::Char('x')), Instant::now());
        assert_eq!(result, EventResult::Continue);
        assert_eq!(state.messages.last().map(|m| m.level), Some(MessageLevel::Warning));
    }

    #[test]
    fn test_clear_suffix_uses_pending_selection() {
        let mut state = make_state();
        let now = Instant::now();
        state.push_intent(SelectionIntent::SelectAll, now);

        let result = handle_normal_mode(&mut state, key(KeyCode::Char('x')), now);
        assert_eq!(result, EventResult::Post(vec![Command::ClearSuffix(ids(&[1, 2, 3, 4, 5]))]));
    }

    #[test]
    fn test_suffix_editor_posts_update() {
        let mut state = make_state();
        state.commit(SelectionIntent::Click(EntryId::new(2)));

        handle_normal_mode(&mut state, key(KeyCode::Char('s')), Instant::now());
        assert_eq!(state.mode, Mode::Input);
        for c in "holiday".chars() {
            handle_input_mode(&mut state, key(KeyCode::Char(c)));
        }
        let result = handle_input_mode(&mut state, key(KeyCode::Enter));

        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(
            result,
            EventResult::Post(vec![Command::UpdateField {
                id: EntryId::new(2),
                update: FieldUpdate::Suffix("holiday".into()),
            }])
        );
    }

    #[test]
    fn test_invalid_date_reports_error() {
        let mut state = make_state();
        state.commit(SelectionIntent::Click(EntryId::new(1)));
        handle_normal_mode(&mut state, key(KeyCode::Char('d')), Instant::now());
        handle_input_mode(&mut state, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        for c in "soon".chars() {
            handle_input_mode(&mut state, key(KeyCode::Char(c)));
        }

        assert_eq!(handle_input_mode(&mut state, key(KeyCode::Enter)), EventResult::Continue);
        assert_eq!(state.messages.last().map(|m| m.level), Some(MessageLevel::Error));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6);
        assert_eq!(parse_date("2024-05-06"), expected);
        assert_eq!(parse_date(" 20240506 "), expected);
        assert_eq!(parse_date("06.05.2024"), None);
    }

    #[test]
    fn test_click_on_name_selects_row() {
        let mut state = make_state();
        let now = Instant::now();

        handle_mouse(&mut state, click(5, 3, KeyModifiers::NONE), now);
        handle_mouse(&mut state, click(5, 4, KeyModifiers::CONTROL), now);
        settle(&mut state, now);

        // only the latest click survives the window
        assert_eq!(state.selection.selected(), ids(&[3]).as_slice());
    }

    #[test]
    fn test_click_on_suffix_cell_opens_editor_only() {
        let mut state = make_state();
        let now = Instant::now();

        // suffix column starts at x = 62
        handle_mouse(&mut state, click(64, 2, KeyModifiers::NONE), now);
        settle(&mut state, now);

        assert!(state.selection.is_empty());
        assert_eq!(state.mode, Mode::Input);
        assert!(matches!(&state.input, Some((InputPurpose::Suffix(t), _)) if t == &ids(&[1])));
    }

    #[test]
    fn test_click_below_last_row_is_ignored() {
        let mut state = make_state();
        assert!(hit_path(&state, 5, 9).is_empty());
        assert_eq!(
            handle_mouse(&mut state, click(5, 9, KeyModifiers::NONE), Instant::now()),
            EventResult::Ignored
        );
    }

    #[test]
    fn test_tag_panel_toggle() {
        let mut state = make_state();
        state.commit(SelectionIntent::SelectAll);

        handle_normal_mode(&mut state, key(KeyCode::Tab), Instant::now());
        assert_eq!(state.focus, Focus::Tags);
        handle_normal_mode(&mut state, key(KeyCode::Down), Instant::now());
        let result = handle_normal_mode(&mut state, key(KeyCode::Char(' ')), Instant::now());

        assert_eq!(
            result,
            EventResult::Post(vec![Command::ToggleTag {
                ids: ids(&[1, 2, 3, 4, 5]),
                tag: "INT".into(),
            }])
        );
    }

    #[test]
    fn test_apply_asks_for_confirmation() {
        let mut state = make_state();

        handle_normal_mode(&mut state, key(KeyCode::Char('a')), Instant::now());
        assert_eq!(state.mode, Mode::Confirm);
        assert_eq!(handle_confirm_mode(&mut state, key(KeyCode::Char('y'))), EventResult::Apply);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn test_busy_refuses_apply_undo_and_quit() {
        let mut state = make_state();
        state.busy = true;
        state.can_undo = true;
        let now = Instant::now();

        handle_normal_mode(&mut state, key(KeyCode::Char('a')), now);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(handle_normal_mode(&mut state, key(KeyCode::Char('u')), now), EventResult::Continue);
        assert_eq!(handle_normal_mode(&mut state, key(KeyCode::Char('q')), now), EventResult::Continue);
        assert!(!state.should_exit);
    }

    #[test]
    fn test_undo_only_when_armed() {
        let mut state = make_state();
        let now = Instant::now();
        assert_eq!(handle_normal_mode(&mut state, key(KeyCode::Char('u')), now), EventResult::Continue);
        state.can_undo = true;
        assert_eq!(handle_normal_mode(&mut state, key(KeyCode::Char('u')), now), EventResult::Undo);
    }

    #[test]
    fn test_esc_clears_then_quits() {
        let mut state = make_state();
        let now = Instant::now();
        state.commit(SelectionIntent::SelectAll);

        assert_eq!(handle_normal_mode(&mut state, key(KeyCode::Esc), now), EventResult::Continue);
        settle(&mut state, now);
        assert!(state.selection.is_empty());
        assert_eq!(handle_normal_mode(&mut state, key(KeyCode::Esc), now), EventResult::Quit);
    }

    #[test]
    fn test_resize_name_column() {
        let mut state = make_state();
        let now = Instant::now();
        assert_eq!(handle_normal_mode(&mut state, key(KeyCode::Char('>')), now), EventResult::ColumnsChanged);
        assert_eq!(state.column_sizes.get("name"), Some(&30));
    }
}
