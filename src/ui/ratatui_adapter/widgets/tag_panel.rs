//! Tag panel widget
//!
//! Lists the catalog tags with a tri-state marker describing how the tag is
//! spread over the current selection.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Widget},
};

use crate::tags::{Catalog, TagState};
use crate::ui::ratatui_adapter::state::AppState;
use crate::ui::ratatui_adapter::theme::Theme;

pub struct TagPanel<'a> {
    state: &'a AppState,
    catalog: &'a Catalog,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> TagPanel<'a> {
    #[must_use]
    pub const fn new(state: &'a AppState, catalog: &'a Catalog, theme: &'a Theme, focused: bool) -> Self {
        Self {
            state,
            catalog,
            theme,
            focused,
        }
    }

    fn title(&self) -> String {
        if self.state.tag_search.is_empty() {
            " Tags ".to_string()
        } else {
            format!(" Tags: {} ", self.state.tag_search)
        }
    }
}

impl Widget for TagPanel<'_> {
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

        let selected = self.state.selected_entries();
        let start = self.state.tag_scroll;
        let end = (start + inner.height as usize).min(self.state.tag_ids.len());

        let items: Vec<ListItem> = self.state.tag_ids[start..end]
            .iter()
            .enumerate()
            .map(|(offset, id)| {
                let marker = TagState::of(selected.iter().copied(), id).marker();
                let is_cursor = self.focused && start + offset == self.state.tag_cursor;
                let line = Line::from(vec![
                    Span::styled(if is_cursor { "> " } else { "  " }, self.theme.cursor_style()),
                    Span::styled(marker, self.theme.tag_style()),
                    Span::raw(" "),
                    Span::styled(id.clone(), self.theme.tag_style()),
                    Span::raw(" "),
                    Span::styled(
                        self.catalog.describe(id, &self.state.language).to_string(),
                        self.theme.dimmed_style(),
                    ),
                ]);
                if is_cursor {
                    ListItem::new(line).style(self.theme.selected_style())
                } else {
                    ListItem::new(line)
                }
            })
            .collect();

        List::new(items).render(inner, buf);
    }
}
