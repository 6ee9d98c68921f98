//! Ratatui-based batch browser
//!
//! ```text
//! ┌──────────────────────────────────┬──────────────┐
//! │ Entry table                      │ Tag panel    │
//! │ (original, tags, date, suffix,   │ [x] EXT      │
//! │  new name)                       │ [~] NGT      │
//! ├──────────────────────────────────┴──────────────┤
//! │ Status bar                          [Renaming...]│
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The browser never mutates entries itself: edits are posted to the engine
//! and the next frame shows the published snapshot. Selection changes are
//! debounced through an intent slot and committed against the snapshot that
//! is current at commit time.

mod browser;
mod events;
mod state;
mod theme;
pub mod widgets;

pub use browser::{Browser, BrowserContext};
pub use events::{EventResult, parse_date};
pub use state::{AppState, Focus, Mode};
pub use theme::Theme;
