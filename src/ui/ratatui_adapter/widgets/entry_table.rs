//! Entry table widget
//!
//! Draws the visible entries as fixed-width columns. The column geometry is
//! computed by [`layout_columns`] so mouse hit testing and rendering agree
//! on where each cell starts.

use std::collections::BTreeMap;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Widget},
};

use crate::naming;
use crate::selection::Control;
use crate::store::FileEntry;
use crate::ui::ratatui_adapter::state::AppState;
use crate::ui::ratatui_adapter::theme::Theme;

/// Width of the cursor gutter in front of every row
pub const GUTTER: u16 = 2;

const MIN_COLUMN: u16 = 4;

/// Table columns, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Tags,
    Date,
    Suffix,
    Computed,
}

impl Column {
    pub const ALL: [Self; 5] = [Self::Name, Self::Tags, Self::Date, Self::Suffix, Self::Computed];

    /// Key under which the width is stored in the settings
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Tags => "tags",
            Self::Date => "date",
            Self::Suffix => "suffix",
            Self::Computed => "computed",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Name => "Original",
            Self::Tags => "Tags",
            Self::Date => "Date",
            Self::Suffix => "Suffix",
            Self::Computed => "New name",
        }
    }

    #[must_use]
    pub const fn default_width(self) -> u16 {
        match self {
            Self::Name => 28,
            Self::Tags => 18,
            Self::Date => 10,
            Self::Suffix => 12,
            Self::Computed => 0,
        }
    }

    /// The editable control living in this column's cells
    #[must_use]
    pub const fn control(self) -> Option<Control> {
        match self {
            Self::Tags => Some(Control::Tags),
            Self::Date => Some(Control::CaptureDate),
            Self::Suffix => Some(Control::Suffix),
            Self::Name | Self::Computed => None,
        }
    }

    fn cell(self, entry: &FileEntry) -> String {
        match self {
            Self::Name => entry.original_name.clone(),
            Self::Tags => entry.tags.join(" "),
            Self::Date => entry.capture_date.format("%Y-%m-%d").to_string(),
            Self::Suffix => entry.suffix.clone(),
            Self::Computed => naming::target_path(&entry.source_path, &entry.computed_name)
                .file_name()
                .map_or_else(|| entry.computed_name.clone(), |n| n.to_string_lossy().into_owned()),
        }
    }
}

/// Horizontal extent of one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub column: Column,
    pub x: u16,
    pub width: u16,
}

impl ColumnSpan {
    #[must_use]
    pub const fn contains(&self, x: u16) -> bool {
        x >= self.x && x < self.x + self.width
    }
}

/// Lay the columns out inside `area`, honouring stored widths.
///
/// The computed-name column takes whatever is left.
#[must_use]
pub fn layout_columns(area: Rect, sizes: &BTreeMap<String, u16>) -> Vec<ColumnSpan> {
    let right = area.x + area.width;
    let mut x = area.x + GUTTER;
    let mut spans = Vec::with_capacity(Column::ALL.len());

    for column in Column::ALL {
        if x >= right {
            break;
        }
        let available = right - x;
        let width = if column == Column::Computed {
            available
        } else {
            sizes
                .get(column.key())
                .copied()
                .unwrap_or_else(|| column.default_width())
                .max(MIN_COLUMN)
                .min(available)
        };
        spans.push(ColumnSpan { column, x, width });
        x = x.saturating_add(width).saturating_add(1);
    }

    spans
}

/// Rows area of the table inside its bordered block (below the header)
#[must_use]
pub fn rows_area(area: Rect) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    Rect {
        y: inner.y.saturating_add(1),
        height: inner.height.saturating_sub(1),
        ..inner
    }
}

/// Table of the visible entries with selection and cursor markers
pub struct EntryTable<'a> {
    state: &'a AppState,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> EntryTable<'a> {
    #[must_use]
    pub const fn new(state: &'a AppState, theme: &'a Theme, focused: bool) -> Self {
        Self { state, theme, focused }
    }

    fn title(&self) -> String {
        let snapshot = &self.state.snapshot;
        let mut title = format!(
            " {} | {}/{} files | {} selected ",
            snapshot.prefix(),
            snapshot.visible_len(),
            snapshot.entries.len(),
            self.state.selection.len()
        );
        if !snapshot.filter.is_empty() {
            title.push_str(&format!("| filter: {} ", snapshot.filter));
        }
        title
    }
}

impl Widget for EntryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused))
            .title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let columns = layout_columns(inner, &self.state.column_sizes);
        for span in &columns {
            buf.set_stringn(
                span.x,
                inner.y,
                span.column.title(),
                span.width as usize,
                self.theme.header_style(),
            );
        }

        let rows = rows_area(area);
        let snapshot = &self.state.snapshot;

        if snapshot.visible_len() == 0 {
            let hint = if snapshot.is_empty() {
                "No files. Press i to import a folder."
            } else {
                "No files match the filter."
            };
            if rows.height > 0 {
                buf.set_stringn(rows.x + GUTTER, rows.y, hint, rows.width as usize, self.theme.dimmed_style());
            }
            return;
        }

        let start = self.state.scroll_offset;
        let end = (start + rows.height as usize).min(snapshot.visible_len());

        for (line, row) in (start..end).enumerate() {
            let Some(entry) = snapshot.visible_entry(row) else {
                continue;
            };
            #[allow(clippy::cast_possible_truncation)]
            let y = rows.y + line as u16;
            let selected = self.state.selection.is_selected(entry.id);
            let row_style = if selected {
                self.theme.selected_style()
            } else {
                self.theme.normal_style()
            };

            buf.set_style(Rect::new(rows.x, y, rows.width, 1), row_style);

            if row == self.state.cursor {
                buf.set_stringn(rows.x, y, ">", 1, self.theme.cursor_style());
            }

            for span in &columns {
                let style = match span.column {
                    _ if selected => row_style,
                    Column::Tags => self.theme.tag_style(),
                    Column::Computed => self.theme.computed_style(),
                    _ => Style::default(),
                };
                buf.set_stringn(span.x, y, span.column.cell(entry), span.width as usize, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_uses_defaults_and_fills_rest() {
        let spans = layout_columns(Rect::new(0, 0, 120, 10), &BTreeMap::new());
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0], ColumnSpan { column: Column::Name, x: 2, width: 28 });
        assert_eq!(spans[1].x, 31);
        let last = spans[4];
        assert_eq!(last.column, Column::Computed);
        assert_eq!(last.x + last.width, 120);
    }

    #[test]
    fn test_layout_honours_stored_width() {
        let sizes = BTreeMap::from([("name".to_string(), 10)]);
        let spans = layout_columns(Rect::new(0, 0, 120, 10), &sizes);
        assert_eq!(spans[0].width, 10);
        assert_eq!(spans[1].x, 13);
    }

    #[test]
    fn test_layout_narrow_area_drops_columns() {
        let spans = layout_columns(Rect::new(0, 0, 20, 10), &BTreeMap::new());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].width, 18);
    }

    #[test]
    fn test_rows_area_skips_border_and_header() {
        assert_eq!(rows_area(Rect::new(0, 0, 50, 10)), Rect::new(1, 2, 48, 7));
    }

    #[test]
    fn test_controls() {
        assert_eq!(Column::Tags.control(), Some(Control::Tags));
        assert_eq!(Column::Suffix.control(), Some(Control::Suffix));
        assert_eq!(Column::Name.control(), None);
    }
}
