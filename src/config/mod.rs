//! Configuration module for tagren
//!
//! User settings live in `<config_dir>/tagren/settings.toml`. Loading never
//! fails from the caller's point of view: a missing or unreadable file yields
//! the built-in defaults, and save errors are logged and dropped.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "tagren";
const SETTINGS_FILE: &str = "settings.toml";

/// Extensions accepted on import when nothing is configured
pub const DEFAULT_FILE_TYPES: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "heic", "mp4", "avi", "mov", "mkv",
];

/// Language used for tag descriptions when nothing is configured
pub const DEFAULT_LANGUAGE: &str = "en";

/// Persisted user settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Folder offered first when importing
    #[serde(default)]
    pub default_import_folder: Option<PathBuf>,

    /// Lowercase extensions without the leading dot
    #[serde(default = "default_file_types")]
    pub allowed_file_types: Vec<String>,

    /// Column widths of the entry table, keyed by column name
    #[serde(default)]
    pub column_sizes: BTreeMap<String, u16>,

    #[serde(default = "default_language")]
    pub language: String,

    /// Last prefix code entered, restored on start
    #[serde(default)]
    pub prefix_code: String,
}

fn default_file_types() -> Vec<String> {
    DEFAULT_FILE_TYPES.iter().map(ToString::to_string).collect()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_import_folder: None,
            allowed_file_types: default_file_types(),
            column_sizes: BTreeMap::new(),
            language: default_language(),
            prefix_code: String::new(),
        }
    }
}

/// Lowercase an extension and drop any leading dots
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

impl Settings {
    /// Normalize and deduplicate the extension list, keeping first occurrence.
    pub fn normalize(&mut self) {
        let mut seen: Vec<String> = Vec::with_capacity(self.allowed_file_types.len());
        for ext in self.allowed_file_types.drain(..) {
            let ext = normalize_extension(&ext);
            if !ext.is_empty() && !seen.contains(&ext) {
                seen.push(ext);
            }
        }
        self.allowed_file_types = seen;
    }

    /// Add an extension to the allow-list. Returns `false` if already present.
    pub fn allow(&mut self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        if ext.is_empty() || self.allowed_file_types.contains(&ext) {
            return false;
        }
        self.allowed_file_types.push(ext);
        true
    }

    /// Remove an extension from the allow-list. Returns `false` if absent.
    pub fn disallow(&mut self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        let before = self.allowed_file_types.len();
        self.allowed_file_types.retain(|e| *e != ext);
        self.allowed_file_types.len() != before
    }

    /// Set a single value by key.
    ///
    /// Known keys are `default_import_folder`, `allowed_file_types` (comma
    /// separated), `language`, `prefix_code` and `column.<name>`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` for an unknown key or an invalid value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();

        match key {
            "default_import_folder" => {
                self.default_import_folder = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "allowed_file_types" => {
                self.allowed_file_types = value.split(',').map(str::to_string).collect();
                self.normalize();
            }
            "language" => {
                if value.is_empty() {
                    return Err(ConfigError::Message("Language cannot be empty".to_string()));
                }
                self.language = value.to_lowercase();
            }
            "prefix_code" => self.prefix_code = crate::naming::sanitize_code(value),
            _ => {
                let Some(column) = key.strip_prefix("column.") else {
                    return Err(ConfigError::Message(format!("Unknown setting '{key}'")));
                };
                let width: u16 = value
                    .parse()
                    .map_err(|e| ConfigError::Message(format!("Invalid width '{value}': {e}")))?;
                self.column_sizes.insert(column.to_string(), width);
            }
        }

        Ok(())
    }
}

/// Directory holding tagren's config files
///
/// # Errors
///
/// Returns `ConfigError` if the system config directory cannot be determined.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))
}

/// Directory holding tagren's log and undo record
///
/// # Errors
///
/// Returns `ConfigError` if the system data directory cannot be determined.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))
}

/// Reads and writes [`Settings`] at a fixed path
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the standard location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn default_location() -> Result<Self, ConfigError> {
        Ok(Self::new(config_dir()?.join(SETTINGS_FILE)))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults on any problem.
    #[must_use]
    pub fn load(&self) -> Settings {
        if !self.path.exists() {
            return Settings::default();
        }

        match self.try_load() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring settings at {}: {e}", self.path.display());
                Settings::default()
            }
        }
    }

    /// Load settings from disk
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn try_load(&self) -> Result<Settings, ConfigError> {
        let mut settings: Settings = Config::builder()
            .add_source(File::from(self.path.as_path()).format(FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.normalize();
        Ok(settings)
    }

    /// Save settings, logging instead of failing.
    pub fn save(&self, settings: &Settings) {
        if let Err(e) = self.try_save(settings) {
            log::warn!("could not save settings: {e}");
        }
    }

    /// Save settings to disk
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the settings
    /// cannot be serialized, or the file cannot be written.
    pub fn try_save(&self, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(settings)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize settings: {e}")))?;

        fs::write(&self.path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write settings file: {e}")))?;

        Ok(())
    }
}
