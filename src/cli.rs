//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for tagren using the `clap` crate.
//!
//! # Commands
//!
//! - **browse**: Interactive terminal UI over an imported batch (default)
//! - **preview**: Print the names a batch would be renamed to
//! - **apply**: Rename a batch on disk and record it for undo
//! - **undo**: Restore the names of the last applied batch
//! - **tags**: List the tag catalog
//! - **config**: Show or change settings

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tagren")]
#[command(about = "Tag, date and batch-rename media files", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

/// Files and folders to import
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportArgs {
    /// Files or folders to import
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Descend into sub-folders
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,
}

/// Metadata applied to every imported file
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchArgs {
    #[command(flatten)]
    pub import: ImportArgs,

    /// Prefix code (defaults to the last one saved in settings)
    #[arg(short = 'p', long = "prefix", value_name = "CODE")]
    pub prefix: Option<String>,

    /// Tags for every file (can specify multiple: -t EXT -t DET)
    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Capture date for every file, overriding the file's own date
    #[arg(short = 'd', long = "date", value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Suffix for every file
    #[arg(short = 's', long = "suffix", value_name = "SUFFIX")]
    pub suffix: Option<String>,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the current settings
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., language=de)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Accept a file extension on import
    Allow {
        #[arg(value_name = "EXT")]
        extension: String,
    },

    /// Stop accepting a file extension on import
    Disallow {
        #[arg(value_name = "EXT")]
        extension: String,
    },
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Open the interactive renamer (default)
    #[command(visible_alias = "b")]
    Browse {
        #[command(flatten)]
        import: ImportArgs,
    },

    /// Show the new name of every file without renaming
    #[command(visible_alias = "p")]
    Preview {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Rename every file on disk
    Apply {
        #[command(flatten)]
        batch: BatchArgs,

        /// Do not ask for confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Undo the last applied batch
    Undo,

    /// List the tag catalog
    Tags {
        /// Language for descriptions (defaults to settings)
        #[arg(short = 'l', long = "lang", value_name = "CODE")]
        lang: Option<String>,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to Browse if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Browse { import: ImportArgs::default() })
    }
}

/// Split a `key=value` argument
#[must_use]
pub fn parse_setting(setting: &str) -> Option<(&str, &str)> {
    let (key, value) = setting.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then_some((key, value))
}
