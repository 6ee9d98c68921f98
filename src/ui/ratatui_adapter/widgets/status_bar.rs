//! Bottom line: newest message on the left, batch state on the right

use crate::ui::output::MessageLevel;
use crate::ui::ratatui_adapter::state::StatusMessage;
use crate::ui::ratatui_adapter::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct StatusBar<'a> {
    messages: &'a [&'a StatusMessage],
    theme: &'a Theme,
    busy: bool,
    can_undo: bool,
}

impl<'a> StatusBar<'a> {
    #[must_use]
    pub const fn new(messages: &'a [&'a StatusMessage], theme: &'a Theme) -> Self {
        Self { messages, theme, busy: false, can_undo: false }
    }

    /// Show whether a batch is running and whether undo is armed
    #[must_use]
    pub const fn with_batch(mut self, busy: bool, can_undo: bool) -> Self {
        self.busy = busy;
        self.can_undo = can_undo;
        self
    }

    const fn marker(level: MessageLevel) -> &'static str {
        match level {
            MessageLevel::Success => "✓ ",
            MessageLevel::Error => "✗ ",
            MessageLevel::Warning => "! ",
            MessageLevel::Info => "· ",
            MessageLevel::Normal => "",
        }
    }

    fn message_line(&self) -> Line<'a> {
        let messages = self.messages;
        let Some(newest) = messages.last() else {
            return Line::default();
        };
        let style = self.theme.level_style(newest.level);
        let mut spans = vec![
            Span::styled(Self::marker(newest.level), style),
            Span::styled(newest.text.as_str(), style),
        ];
        if messages.len() > 1 {
            spans.push(Span::styled(
                format!("  (+{})", messages.len() - 1),
                self.theme.dimmed_style(),
            ));
        }
        Line::from(spans)
    }

    fn batch_label(&self) -> Span<'static> {
        if self.busy {
            Span::styled(
                " renaming… ",
                self.theme.level_style(MessageLevel::Warning).add_modifier(Modifier::BOLD),
            )
        } else if self.can_undo {
            Span::styled(" u: undo last batch ", self.theme.level_style(MessageLevel::Info))
        } else {
            Span::styled(" ready ", self.theme.dimmed_style())
        }
    }
}

impl Widget for StatusBar<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = self.batch_label();
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(label.width() as u16)])
                .areas(inner);

        Paragraph::new(self.message_line()).render(left, buf);
        Paragraph::new(Line::from(label)).render(right, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bar: StatusBar<'_>) -> String {
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        (0..area.width)
            .map(|x| buf[(x, 1)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_newest_message_and_backlog() {
        let theme = Theme::default();
        let older = StatusMessage::new(MessageLevel::Info, "Imported 3 file(s)".into());
        let newer = StatusMessage::new(MessageLevel::Error, "Rename failed".into());
        let messages = [&older, &newer];

        let line = render(StatusBar::new(&messages, &theme));
        assert!(line.contains("✗ Rename failed  (+1)"));
        assert!(line.contains("ready"));
    }

    #[test]
    fn test_batch_labels() {
        let theme = Theme::default();
        assert!(render(StatusBar::new(&[], &theme).with_batch(true, true)).contains("renaming"));
        assert!(render(StatusBar::new(&[], &theme).with_batch(false, true)).contains("u: undo"));
    }
}
