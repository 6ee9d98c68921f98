//! User interface layer
//!
//! Two front-ends share the same engine and batch controller:
//!
//! - [`output`] - line-oriented messages for the non-interactive commands
//! - [`ratatui_adapter`] - the interactive terminal browser
//!
//! ```
//! use tagren::ui::output::{OutputWriter, StdoutWriter};
//!
//! let output = StdoutWriter::new();
//! output.success("Renamed 3 file(s)");
//! output.info("Run 'tagren undo' to revert");
//! ```

mod error;

pub mod output;
pub mod ratatui_adapter;

pub use error::{Result, UiError};
pub use output::{MessageLevel, OutputWriter, StdoutWriter};
