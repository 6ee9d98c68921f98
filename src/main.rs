//! Tagren CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # Interactive renamer (default command), optionally importing a folder
//! tagren
//! tagren browse ~/Pictures/trip -r
//!
//! # Print the planned names without touching disk
//! tagren preview ~/Pictures/trip -p 42 -t EXT -t NGT --date 2024-05-06
//!
//! # Rename on disk, then revert
//! tagren apply ~/Pictures/trip -p 42 -t EXT --yes
//! tagren undo
//!
//! # Tag catalog and settings
//! tagren tags --lang de
//! tagren config set language=de
//! ```
//!
//! # Configuration
//!
//! Settings live in `~/.config/tagren/settings.toml` on Linux. A custom tag
//! catalog can be placed next to it as `tags.toml`. The undo record and the
//! browser's log file are kept in the data directory.

use tagren::{
    TagrenError,
    cli::{Cli, Commands},
    commands::{self, apply::ApplyContext},
    config::{self, SettingsStore},
    history::HistoryFile,
    logging::{self, LogTarget},
    tags::Catalog,
    ui::StdoutWriter,
};

type Result<T> = std::result::Result<T, TagrenError>;

/// Load the user's tag catalog, falling back to the built-in one
fn load_catalog() -> Result<Catalog> {
    let path = config::config_dir()?.join("tags.toml");
    match Catalog::load(Some(&path)) {
        Ok(catalog) => Ok(catalog),
        Err(e) => {
            log::warn!("ignoring tag catalog {}: {e}", path.display());
            eprintln!("Warning: ignoring tag catalog {}: {e}", path.display());
            Ok(Catalog::builtin()?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let command = cli.get_command();

    // the browser owns the terminal, so its log goes to a file
    let log_target = if matches!(command, Commands::Browse { .. }) {
        LogTarget::file_in(&config::data_dir()?)
    } else {
        LogTarget::Stderr
    };
    if let Err(e) = logging::init(&log_target) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let settings_store = SettingsStore::default_location()?;
    let settings = settings_store.load();
    let history = HistoryFile::in_dir(&config::data_dir()?);
    let out = StdoutWriter::quiet(cli.quiet);

    match &command {
        Commands::Browse { import } => {
            let catalog = load_catalog()?;
            commands::browse(import, settings, settings_store, catalog, history).await?;
        }
        Commands::Preview { batch } => {
            commands::preview(batch, &settings, &out, cli.quiet).await?;
        }
        Commands::Apply { batch, yes } => {
            let ctx = ApplyContext {
                settings: &settings,
                settings_store: &settings_store,
                history: &history,
            };
            commands::apply(batch, *yes, &ctx, &out, cli.quiet).await?;
        }
        Commands::Undo => {
            commands::undo(&history, &out).await?;
        }
        Commands::Tags { lang } => {
            let catalog = load_catalog()?;
            let language = lang.as_deref().unwrap_or(&settings.language);
            commands::tags(&catalog, language, &out, cli.quiet)?;
        }
        Commands::Config { command } => {
            commands::config(command, &settings_store, &out)?;
        }
    }

    Ok(())
}
