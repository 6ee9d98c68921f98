//! Colours of the browser

use ratatui::style::{Color, Modifier, Style};

use crate::ui::output::MessageLevel;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Focused borders, cursor, highlighted text
    pub accent: Color,
    /// Borders of unfocused panes, hints, inactive text
    pub muted: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub header: Color,
    /// Planned file names
    pub planned: Color,
    pub tag: Color,
    pub ok: Color,
    pub warn: Color,
    pub fail: Color,
    pub note: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selected_bg: Color::Blue,
            selected_fg: Color::White,
            header: Color::Yellow,
            planned: Color::Green,
            tag: Color::Magenta,
            ok: Color::Green,
            warn: Color::Yellow,
            fail: Color::Red,
            note: Color::Cyan,
        }
    }

    const fn fg(color: Color) -> Style {
        Style::new().fg(color)
    }

    /// Selected rows
    #[must_use]
    pub const fn selected_style(&self) -> Style {
        Style::new()
            .bg(self.selected_bg)
            .fg(self.selected_fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Cursor marker and text caret
    #[must_use]
    pub const fn cursor_style(&self) -> Style {
        Self::fg(self.accent).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub const fn header_style(&self) -> Style {
        Self::fg(self.header).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub const fn computed_style(&self) -> Style {
        Self::fg(self.planned)
    }

    #[must_use]
    pub const fn normal_style(&self) -> Style {
        Style::new()
    }

    #[must_use]
    pub const fn dimmed_style(&self) -> Style {
        Self::fg(self.muted)
    }

    #[must_use]
    pub const fn tag_style(&self) -> Style {
        Self::fg(self.tag)
    }

    #[must_use]
    pub const fn border_style(&self, focused: bool) -> Style {
        if focused { Self::fg(self.accent) } else { Self::fg(self.muted) }
    }

    /// Colour of a status message
    #[must_use]
    pub const fn level_style(&self, level: MessageLevel) -> Style {
        match level {
            MessageLevel::Success => Self::fg(self.ok),
            MessageLevel::Warning => Self::fg(self.warn),
            MessageLevel::Error => Self::fg(self.fail).add_modifier(Modifier::BOLD),
            MessageLevel::Info => Self::fg(self.note),
            MessageLevel::Normal => Style::new(),
        }
    }
}
