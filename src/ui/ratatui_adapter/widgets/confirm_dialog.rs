//! Yes/no dialog in front of apply and clear-all
//!
//! Apply lists the first planned renames so the user sees what the batch
//! will do before any file is touched.

use crate::ui::output::MessageLevel;
use crate::ui::ratatui_adapter::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Context lines shown before collapsing the rest into a count
const CONTEXT_LINES: usize = 3;
const MIN_WIDTH: u16 = 40;
const MAX_WIDTH: u16 = 80;

#[derive(Debug, Clone)]
pub struct ConfirmDialogState {
    pub title: String,
    pub message: String,
    /// Example lines, e.g. `old -> new`
    pub context: Vec<String>,
}

impl ConfirmDialogState {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            context: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }
}

pub struct ConfirmDialog<'a> {
    state: &'a ConfirmDialogState,
    theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    #[must_use]
    pub const fn new(state: &'a ConfirmDialogState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Keep the tail of a long line, where the new file name is
    fn truncate_front(text: &str, max: usize) -> String {
        let count = text.chars().count();
        if count <= max || max < 4 {
            return text.to_string();
        }
        let tail: String = text.chars().skip(count - (max - 3)).collect();
        format!("...{tail}")
    }

    fn lines(&self, inner_width: usize) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(self.state.message.clone()), Line::default()];

        let context = &self.state.context;
        for entry in context.iter().take(CONTEXT_LINES) {
            let shown = Self::truncate_front(entry, inner_width.saturating_sub(2));
            lines.push(Line::styled(shown, self.theme.dimmed_style()));
        }
        if context.len() > CONTEXT_LINES {
            lines.push(Line::styled(
                format!("+{} more", context.len() - CONTEXT_LINES),
                self.theme.dimmed_style(),
            ));
        }
        if !context.is_empty() {
            lines.push(Line::default());
        }

        let yes = self.theme.level_style(MessageLevel::Error).add_modifier(Modifier::REVERSED);
        let no = self.theme.level_style(MessageLevel::Success).add_modifier(Modifier::REVERSED);
        lines.push(Line::from(vec![
            Span::styled(" y  yes ", yes),
            Span::raw("   "),
            Span::styled(" n  no ", no),
        ]));
        lines
    }
}

impl Widget for ConfirmDialog<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let wanted = self.state.message.chars().count() as u16 + 4;
        let width = wanted.clamp(MIN_WIDTH, MAX_WIDTH).min(area.width);
        let lines = self.lines(width.saturating_sub(2) as usize);
        let height = (lines.len() as u16 + 2).min(area.height);
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.level_style(MessageLevel::Warning))
            .title(format!(" {} ", self.state.title))
            .title_bottom(" Enter confirms, Esc cancels ")
            .title_alignment(Alignment::Center);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(state: &ConfirmDialogState) -> String {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 60, 14);
        let mut buf = Buffer::empty(area);
        ConfirmDialog::new(state, &theme).render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_truncate_front_keeps_tail() {
        assert_eq!(ConfirmDialog::truncate_front("abcdefghij", 7), "...ghij");
        assert_eq!(ConfirmDialog::truncate_front("short", 7), "short");
    }

    #[test]
    fn test_renders_message_and_buttons() {
        let text = rendered(&ConfirmDialogState::new("Clear", "Discard all files?"));
        assert!(text.contains("Discard all files?"));
        assert!(text.contains("y  yes"));
    }

    #[test]
    fn test_long_context_is_collapsed() {
        let context = (1..=5).map(|i| format!("f{i}.jpg -> C1_NOTAGS_20240102_{i}.jpg")).collect();
        let state = ConfirmDialogState::new("Apply", "Rename 5 file(s) on disk?").with_context(context);
        let text = rendered(&state);

        assert!(text.contains("f3.jpg -> C1_NOTAGS_20240102_3.jpg"));
        assert!(!text.contains("f4.jpg"));
        assert!(text.contains("+2 more"));
    }
}
