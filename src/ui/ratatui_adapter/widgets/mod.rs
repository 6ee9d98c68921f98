//! Ratatui widgets for the batch browser

mod confirm_dialog;
mod entry_table;
mod help_overlay;
mod status_bar;
mod tag_panel;
mod text_input;

pub use confirm_dialog::{ConfirmDialog, ConfirmDialogState};
pub use entry_table::{Column, ColumnSpan, EntryTable, GUTTER, layout_columns, rows_area};
pub use help_overlay::HelpOverlay;
pub use status_bar::StatusBar;
pub use tag_panel::TagPanel;
pub use text_input::{TextInputModal, TextInputState};
