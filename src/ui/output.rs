//! Output abstraction layer
//!
//! Commands report through [`OutputWriter`] so the same code can print to
//! the terminal or collect messages for inspection.

use colored::Colorize;
use std::sync::{Mutex, PoisonError};

/// Message level for categorizing output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Results; always shown
    Normal,
    Error,
    Success,
    Warning,
    /// Secondary detail, hidden in quiet mode
    Info,
}

/// Sink for user-facing messages
///
/// Implementors provide [`emit`](OutputWriter::emit); the per-level helpers
/// forward to it.
///
/// # Examples
///
/// ```
/// use tagren::ui::output::{OutputWriter, StdoutWriter};
///
/// let output = StdoutWriter::new();
/// output.write("C42_EXT_20240102.jpg");
/// output.success("Renamed 3 files");
/// output.error("Rename failed for a.jpg");
/// ```
pub trait OutputWriter: Send + Sync {
    fn emit(&self, level: MessageLevel, message: &str);

    fn write(&self, message: &str) {
        self.emit(MessageLevel::Normal, message);
    }

    fn error(&self, message: &str) {
        self.emit(MessageLevel::Error, message);
    }

    fn success(&self, message: &str) {
        self.emit(MessageLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.emit(MessageLevel::Warning, message);
    }

    fn info(&self, message: &str) {
        self.emit(MessageLevel::Info, message);
    }
}

/// Terminal writer; errors go to stderr
///
/// In quiet mode only results and errors are printed, so output can be
/// piped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutWriter {
    quiet: bool,
}

impl StdoutWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self { quiet: false }
    }

    #[must_use]
    pub const fn quiet(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl OutputWriter for StdoutWriter {
    fn emit(&self, level: MessageLevel, message: &str) {
        match level {
            MessageLevel::Normal => println!("{message}"),
            MessageLevel::Error => eprintln!("{} {message}", "error:".red().bold()),
            _ if self.quiet => {}
            MessageLevel::Success => println!("{} {message}", "✓".green()),
            MessageLevel::Warning => println!("{} {message}", "warning:".yellow()),
            MessageLevel::Info => println!("{}", message.dimmed()),
        }
    }
}

/// Writer that keeps every message in memory
#[derive(Debug, Default)]
pub struct BufferWriter {
    messages: Mutex<Vec<(MessageLevel, String)>>,
}

impl BufferWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages written so far, oldest first
    #[must_use]
    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Messages of one level
    #[must_use]
    pub fn at_level(&self, level: MessageLevel) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|(l, m)| (l == level).then_some(m))
            .collect()
    }
}

impl OutputWriter for BufferWriter {
    fn emit(&self, level: MessageLevel, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}
