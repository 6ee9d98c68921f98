//! Modal line editor used for filter, prefix, tags, date, suffix and import
//! prompts.
//!
//! Tag prompts get a completion list drawn from the catalog: the word under
//! the cursor narrows it, tags already typed drop out of it and `Tab`
//! replaces the word with the highlighted tag.

use crate::ui::ratatui_adapter::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

const MAX_SUGGESTIONS: usize = 8;
const MODAL_WIDTH: u16 = 64;

/// Candidate list for a multi-value prompt
#[derive(Debug, Clone, Default)]
struct Completion {
    vocabulary: Vec<String>,
    matches: Vec<String>,
    highlighted: usize,
}

/// Editing state of the modal
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    pub prompt: String,
    chars: Vec<char>,
    /// Position in `chars`, between 0 and `chars.len()`
    cursor: usize,
    completion: Option<Completion>,
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// `needle` characters appear in `hay` in order, ignoring case
fn subsequence(hay: &str, needle: &str) -> bool {
    let mut rest = hay.chars().flat_map(char::to_lowercase);
    needle
        .chars()
        .flat_map(char::to_lowercase)
        .all(|n| rest.any(|h| h == n))
}

impl TextInputState {
    /// Prompt prefilled with `initial`, cursor at the end
    #[must_use]
    pub fn new(prompt: impl Into<String>, initial: impl Into<String>) -> Self {
        let chars: Vec<char> = initial.into().chars().collect();
        Self {
            prompt: prompt.into(),
            cursor: chars.len(),
            chars,
            completion: None,
        }
    }

    /// Treat the input as a list of values completed from `vocabulary`
    #[must_use]
    pub fn with_autocomplete(mut self, vocabulary: Vec<String>) -> Self {
        self.completion = Some(Completion { vocabulary, ..Completion::default() });
        self.refresh();
        self
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Separated values; the whole trimmed text for a plain prompt
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        self.text()
            .split(is_separator)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect()
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        match &self.completion {
            Some(completion) => &completion.matches,
            None => &[],
        }
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<&str> {
        let completion = self.completion.as_ref()?;
        completion.matches.get(completion.highlighted).map(String::as_str)
    }

    /// Start of the value the cursor is in
    fn word_start(&self) -> usize {
        if self.completion.is_none() {
            return 0;
        }
        self.chars[..self.cursor]
            .iter()
            .rposition(|c| is_separator(*c))
            .map_or(0, |i| i + 1)
    }

    fn refresh(&mut self) {
        let word: String = self.chars[self.word_start()..self.cursor].iter().collect();
        let typed = self.values();
        let Some(completion) = self.completion.as_mut() else {
            return;
        };

        completion.matches = completion
            .vocabulary
            .iter()
            .filter(|tag| !typed.contains(tag) && subsequence(tag, &word))
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect();
        if completion.highlighted >= completion.matches.len() {
            completion.highlighted = 0;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
        self.refresh();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        self.refresh();
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
            self.refresh();
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.refresh();
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
        self.refresh();
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
        self.refresh();
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.chars.len();
        self.refresh();
    }

    pub fn suggestion_up(&mut self) {
        if let Some(c) = self.completion.as_mut().filter(|c| !c.matches.is_empty()) {
            c.highlighted = c.highlighted.checked_sub(1).unwrap_or(c.matches.len() - 1);
        }
    }

    pub fn suggestion_down(&mut self) {
        if let Some(c) = self.completion.as_mut().filter(|c| !c.matches.is_empty()) {
            c.highlighted = (c.highlighted + 1) % c.matches.len();
        }
    }

    /// Replace the word under the cursor with the highlighted tag and a space
    pub fn accept_suggestion(&mut self) {
        let Some(tag) = self.highlighted().map(String::from) else {
            return;
        };

        let start = self.word_start();
        let end = self.chars[start..]
            .iter()
            .position(|c| is_separator(*c))
            .map_or(self.chars.len(), |i| start + i);

        let mut replacement: Vec<char> = tag.chars().collect();
        replacement.push(' ');
        self.cursor = start + replacement.len();
        self.chars.splice(start..end, replacement);
        self.refresh();
    }

    /// Ctrl+U
    pub fn clear_line(&mut self) {
        self.chars.clear();
        self.cursor = 0;
        self.refresh();
    }

    /// Window of the text that fits in `width` columns and the cursor column
    fn window(&self, width: usize) -> (String, usize) {
        let len = self.chars.len();
        let start = if len < width || self.cursor < width {
            0
        } else {
            (self.cursor + 1).saturating_sub(width)
        };
        let shown = self.chars[start..].iter().take(width).collect();
        (shown, self.cursor - start)
    }
}

/// Centered modal drawing a [`TextInputState`]
pub struct TextInputModal<'a> {
    state: &'a TextInputState,
    theme: &'a Theme,
}

impl<'a> TextInputModal<'a> {
    #[must_use]
    pub const fn new(state: &'a TextInputState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn input_line(&self, width: usize) -> Line<'static> {
        let (shown, at) = self.state.window(width.max(1));
        let before: String = shown.chars().take(at).collect();
        let under: String = shown.chars().nth(at).map_or_else(|| " ".to_string(), String::from);
        let after: String = shown.chars().skip(at + 1).collect();

        Line::from(vec![
            Span::styled(before, self.theme.normal_style()),
            Span::styled(under, self.theme.cursor_style().add_modifier(Modifier::REVERSED)),
            Span::styled(after, self.theme.normal_style()),
        ])
    }

    fn suggestion_lines(&self) -> Vec<Line<'static>> {
        let highlighted = self.state.highlighted();
        self.state
            .suggestions()
            .iter()
            .map(|tag| {
                if Some(tag.as_str()) == highlighted {
                    Line::styled(format!("> {tag}"), self.theme.tag_style().add_modifier(Modifier::BOLD))
                } else {
                    Line::styled(format!("  {tag}"), self.theme.dimmed_style())
                }
            })
            .collect()
    }
}

impl Widget for TextInputModal<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let suggestions = self.suggestion_lines();
        let list_rows = suggestions.len() as u16;
        // border + input + list + hint + border
        let height = (4 + list_rows).min(area.height);
        let width = MODAL_WIDTH.min(area.width.saturating_sub(2));
        let modal = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        Clear.render(modal, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true))
            .title(format!(" {} ", self.state.prompt))
            .title_alignment(Alignment::Center);
        let inner = block.inner(modal);
        block.render(modal, buf);

        let [input, list, hint] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(list_rows),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(self.input_line(input.width as usize)).render(input, buf);
        Paragraph::new(suggestions).render(list, buf);

        let keys = if list_rows > 0 {
            "Tab complete  ↑↓ choose  Enter ok  Esc cancel"
        } else {
            "Enter ok  Esc cancel"
        };
        Paragraph::new(keys)
            .style(self.theme.dimmed_style())
            .alignment(Alignment::Center)
            .render(hint, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> Vec<String> {
        vec!["EXT".to_string(), "INT".to_string(), "NGT".to_string()]
    }

    fn type_str(state: &mut TextInputState, text: &str) {
        text.chars().for_each(|c| state.insert_char(c));
    }

    #[test]
    fn test_initial_text_puts_cursor_at_end() {
        let state = TextInputState::new("Suffix", "été");
        assert_eq!(state.cursor(), 3);
        assert_eq!(state.text(), "été");
    }

    #[test]
    fn test_editing_multibyte() {
        let mut state = TextInputState::new("Suffix", "");
        type_str(&mut state, "ét");
        state.cursor_left();
        state.backspace();
        assert_eq!(state.text(), "t");
        assert_eq!(state.cursor(), 0);

        state.cursor_end();
        state.insert_char('!');
        state.cursor_home();
        state.delete();
        assert_eq!(state.text(), "!");
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = TextInputState::new("Test", "ab");
        state.cursor_right();
        assert_eq!(state.cursor(), 2);
        state.cursor_home();
        state.cursor_left();
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_suggestions_follow_current_word() {
        let mut state = TextInputState::new("Tags", "").with_autocomplete(tags());
        assert_eq!(state.suggestions().len(), 3);

        state.insert_char('n');
        assert_eq!(state.suggestions(), ["INT", "NGT"]);

        state.insert_char('g');
        assert_eq!(state.suggestions(), ["NGT"]);
    }

    #[test]
    fn test_accept_suggestion_skips_entered() {
        let mut state = TextInputState::new("Tags", "EXT, ng").with_autocomplete(tags());
        state.accept_suggestion();
        assert_eq!(state.text(), "EXT, NGT ");
        assert_eq!(state.values(), vec!["EXT".to_string(), "NGT".to_string()]);
        assert_eq!(state.suggestions(), ["INT"]);
    }

    #[test]
    fn test_accept_replaces_whole_word_mid_edit() {
        let mut state = TextInputState::new("Tags", "ex INT").with_autocomplete(tags());
        state.cursor_home();
        state.cursor_right();
        state.accept_suggestion();
        assert_eq!(state.text(), "EXT  INT");
    }

    #[test]
    fn test_highlight_wraps() {
        let mut state = TextInputState::new("Tags", "").with_autocomplete(tags());
        state.suggestion_up();
        assert_eq!(state.highlighted(), Some("NGT"));
        state.suggestion_down();
        assert_eq!(state.highlighted(), Some("EXT"));
    }

    #[test]
    fn test_plain_input_has_no_suggestions() {
        let mut state = TextInputState::new("Filter", "");
        state.insert_char('a');
        assert!(state.suggestions().is_empty());
        assert_eq!(state.highlighted(), None);
    }

    #[test]
    fn test_long_text_window_keeps_cursor_visible() {
        let state = TextInputState::new("Import", "abcdefghij");
        let (shown, at) = state.window(4);
        assert_eq!(shown, "hij");
        assert_eq!(at, 3);
    }
}
