//! Key reference shown on `?`

use crate::ui::ratatui_adapter::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::Modifier,
    widgets::{Block, Borders, Cell, Clear, Row, Table, Widget},
};

const KEY_WIDTH: u16 = 12;
const WIDTH: u16 = 54;

/// Heading, then `(keys, action)` pairs
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Selecting",
        &[
            ("↑ ↓", "select previous / next file"),
            ("Shift ↑ ↓", "grow or shrink the selection"),
            ("j k", "move the cursor only"),
            ("Enter", "select the file under the cursor"),
            ("Space", "add / drop the file under the cursor"),
            ("v", "select from anchor to cursor"),
            ("Ctrl+A", "select every visible file"),
            ("Esc", "clear selection, then quit"),
            ("click", "select; Ctrl adds, Shift ranges"),
        ],
    ),
    (
        "Naming",
        &[
            ("t", "tags of the selection"),
            ("d", "capture date"),
            ("s  x", "set / clear suffix"),
            ("Tab", "tag panel; Space toggles a tag"),
            ("p", "prefix code"),
            ("/", "filter by file name"),
            ("<  >", "narrow / widen the name column"),
        ],
    ),
    (
        "Batch",
        &[
            ("i  I", "add files / replace the batch"),
            ("Del", "drop the selection from the batch"),
            ("C", "drop every file"),
            ("a", "rename on disk"),
            ("u", "undo the last rename"),
            ("q", "quit"),
        ],
    ),
];

pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    #[must_use]
    pub const fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn rows(&self) -> Vec<Row<'static>> {
        let mut rows = Vec::new();
        for (i, (heading, keys)) in SECTIONS.iter().enumerate() {
            if i > 0 {
                rows.push(Row::new([""]));
            }
            let heading_style = self.theme.header_style().add_modifier(Modifier::UNDERLINED);
            rows.push(Row::new([Cell::from(*heading)]).style(heading_style));
            rows.extend(keys.iter().map(|(key, action)| {
                Row::new([
                    Cell::from(*key).style(self.theme.cursor_style()),
                    Cell::from(*action),
                ])
            }));
        }
        rows
    }
}

impl Widget for HelpOverlay<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.rows();
        let height = (rows.len() as u16 + 2).min(area.height);
        let width = WIDTH.min(area.width);
        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true))
            .title(" Keys ")
            .title_bottom(" any key closes ")
            .title_alignment(Alignment::Center);

        Table::new(rows, [Constraint::Length(KEY_WIDTH), Constraint::Min(0)])
            .block(block)
            .render(popup, buf);
    }
}
