//! Config command - show and change settings

use crate::cli::{ConfigCommands, parse_setting};
use crate::config::SettingsStore;
use crate::ui::output::OutputWriter;
use crate::TagrenError;

type Result<T> = std::result::Result<T, TagrenError>;

/// Execute the config command
///
/// # Errors
/// Returns an error for a malformed `key=value`, an unknown key, or when
/// the settings cannot be written
pub fn execute(command: &ConfigCommands, store: &SettingsStore, out: &dyn OutputWriter) -> Result<()> {
    let mut settings = store.load();

    match command {
        ConfigCommands::Show => {
            let text = toml::to_string_pretty(&settings)
                .map_err(|e| TagrenError::InvalidInput(format!("Failed to render settings: {e}")))?;
            out.info(&format!("# {}", store.path().display()));
            out.write(text.trim_end());
            return Ok(());
        }
        ConfigCommands::Set { setting } => {
            let (key, value) = parse_setting(setting).ok_or_else(|| {
                TagrenError::InvalidInput(format!("Expected KEY=VALUE, got '{setting}'"))
            })?;
            settings.set(key, value)?;
            out.success(&format!("Set {key}"));
        }
        ConfigCommands::Allow { extension } => {
            if settings.allow(extension) {
                out.success(&format!("Allowed .{}", crate::config::normalize_extension(extension)));
            } else {
                out.info("Already allowed");
            }
        }
        ConfigCommands::Disallow { extension } => {
            if settings.disallow(extension) {
                out.success(&format!("Disallowed .{}", crate::config::normalize_extension(extension)));
            } else {
                out.info("Not in the allow-list");
            }
        }
    }

    store.try_save(&settings)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::output::{BufferWriter, MessageLevel};
    use tempfile::TempDir;

    #[test]
    fn test_set_persists() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));
        let out = BufferWriter::new();

        execute(&ConfigCommands::Set { setting: "language=de".into() }, &store, &out).unwrap();
        execute(&ConfigCommands::Allow { extension: ".NEF".into() }, &store, &out).unwrap();

        let settings = store.load();
        assert_eq!(settings.language, "de");
        assert!(settings.allowed_file_types.contains(&"nef".to_string()));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));
        let out = BufferWriter::new();

        assert!(matches!(
            execute(&ConfigCommands::Set { setting: "language".into() }, &store, &out),
            Err(TagrenError::InvalidInput(_))
        ));
        assert!(matches!(
            execute(&ConfigCommands::Set { setting: "color=red".into() }, &store, &out),
            Err(TagrenError::ConfigError(_))
        ));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_show_prints_settings() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));
        let out = BufferWriter::new();

        execute(&ConfigCommands::Show, &store, &out).unwrap();
        let printed = out.at_level(MessageLevel::Normal).join("\n");
        assert!(printed.contains("language = \"en\""));
    }
}
