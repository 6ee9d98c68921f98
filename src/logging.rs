//! Logger setup
//!
//! The terminal UI owns the screen, so it logs to a file in the data
//! directory. Plain commands log to stderr. `TAGREN_LOG` takes an
//! `env_logger` filter string and overrides the default level.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "TAGREN_LOG";

const LOG_FILE: &str = "tagren.log";

/// Where log records go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// Log file inside the given directory
    #[must_use]
    pub fn file_in(dir: &Path) -> Self {
        Self::File(dir.join(LOG_FILE))
    }

    const fn default_filter(&self) -> &'static str {
        match self {
            Self::Stderr => "warn",
            Self::File(_) => "info",
        }
    }
}

/// Install the global logger.
///
/// Calling this twice is harmless; the second call is ignored.
///
/// # Errors
///
/// Returns an I/O error if the log file cannot be opened.
pub fn init(target: &LogTarget) -> io::Result<()> {
    let mut builder = Builder::from_env(Env::new().filter_or(LOG_ENV, target.default_filter()));

    if let LogTarget::File(path) = target {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file))).write_style(env_logger::WriteStyle::Never);
    }

    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_target_creates_log_dir() {
        let dir = TempDir::new().unwrap();
        let target = LogTarget::file_in(&dir.path().join("state"));

        init(&target).unwrap();

        assert!(dir.path().join("state").join(LOG_FILE).exists());
    }

    #[test]
    fn test_default_filters() {
        assert_eq!(LogTarget::Stderr.default_filter(), "warn");
        assert_eq!(LogTarget::file_in(Path::new("/tmp")).default_filter(), "info");
    }
}
