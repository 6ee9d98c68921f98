//! Interactive batch browser
//!
//! Runs the terminal loop on a blocking thread. Engine mutations are posted
//! without waiting; each frame draws the newest published snapshot. Apply
//! and undo run as tasks on the tokio runtime and report back over a
//! channel, so the UI keeps drawing while files are renamed.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::{Block, Borders},
};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::events::{EventResult, poll_and_handle};
use super::state::{AppState, Focus, Mode};
use super::theme::Theme;
use super::widgets::{
    ConfirmDialog, EntryTable, HelpOverlay, StatusBar, TagPanel, TextInputModal, layout_columns,
    rows_area,
};
use crate::batch::{self, BatchController, BatchOutcome};
use crate::config::{Settings, SettingsStore};
use crate::engine::{Command, EngineHandle};
use crate::history::HistoryFile;
use crate::tags::Catalog;
use crate::ui::error::Result;
use crate::ui::output::MessageLevel;
use crate::{import, naming, output};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything the browser needs from the rest of the application
#[derive(Debug)]
pub struct BrowserContext {
    pub engine: EngineHandle,
    pub controller: BatchController,
    pub catalog: Catalog,
    pub settings: Settings,
    pub settings_store: SettingsStore,
    pub history: HistoryFile,
    /// Descend into sub-folders when importing
    pub recursive: bool,
    /// Runtime that runs apply and undo
    pub runtime: Handle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchKind {
    Apply,
    Undo,
}

impl BatchKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Apply => "Rename",
            Self::Undo => "Undo",
        }
    }
}

#[derive(Debug)]
struct BatchDone {
    kind: BatchKind,
    result: batch::Result<BatchOutcome>,
}

/// Ratatui front-end over the engine and batch controller
#[derive(Debug, Default)]
pub struct Browser {
    theme: Theme,
}

impl Browser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_theme(theme: Theme) -> Self {
        Self { theme }
    }

    /// Setup terminal for TUI
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    }

    /// Cleanup terminal after TUI
    fn cleanup_terminal() -> Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Run the browser until the user quits.
    ///
    /// Blocks the calling thread; call it from `spawn_blocking`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be driven or the engine
    /// worker stops.
    pub fn run(&self, mut ctx: BrowserContext) -> Result<()> {
        let mut terminal = Self::setup_terminal()?;

        let result = self.run_loop(&mut terminal, &mut ctx);

        if let Err(e) = Self::cleanup_terminal() {
            log::error!("terminal cleanup failed: {e}");
            eprintln!("Warning: terminal cleanup failed: {e}");
        }

        result
    }

    fn run_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        ctx: &mut BrowserContext,
    ) -> Result<()> {
        let tag_ids = ctx.catalog.ids().map(String::from).collect();
        let mut state = AppState::new(ctx.engine.latest(), tag_ids, ctx.settings.language.clone())
            .with_column_sizes(ctx.settings.column_sizes.clone());
        state.import_folder.clone_from(&ctx.settings.default_import_folder);
        state.can_undo = ctx.controller.can_undo();

        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<BatchDone>();

        loop {
            state.sync_snapshot(ctx.engine.latest());
            state.commit_due(Instant::now());
            while let Ok(done) = done_rx.try_recv() {
                Self::finish_batch(&mut state, ctx, done);
            }
            state.cleanup_messages();

            terminal.draw(|frame| self.render(frame, &mut state, &ctx.catalog))?;

            let timeout = state
                .intents
                .time_until_due(Instant::now())
                .map_or(POLL_INTERVAL, |due| due.min(POLL_INTERVAL));

            match poll_and_handle(&mut state, timeout)? {
                EventResult::Continue | EventResult::Ignored => {}
                EventResult::Quit => break,
                EventResult::Post(commands) => {
                    for command in commands {
                        ctx.engine.post(command)?;
                    }
                }
                EventResult::SetPrefix(code) => {
                    ctx.engine.post(Command::SetPrefix(code.clone()))?;
                    state.add_message(
                        MessageLevel::Info,
                        format!("Prefix set to {}", naming::prefix_for(&code)),
                    );
                    ctx.settings.prefix_code = code;
                    ctx.settings_store.save(&ctx.settings);
                }
                EventResult::Import { path, replace } => {
                    Self::import(&mut state, ctx, path, replace)?;
                }
                EventResult::SearchTags(term) => {
                    let ids = if term.is_empty() {
                        ctx.catalog.ids().map(String::from).collect()
                    } else {
                        ctx.catalog
                            .search(&term, &state.language)
                            .into_iter()
                            .map(String::from)
                            .collect()
                    };
                    state.set_tag_ids(ids);
                }
                EventResult::ColumnsChanged => {
                    ctx.settings.column_sizes.clone_from(&state.column_sizes);
                    ctx.settings_store.save(&ctx.settings);
                }
                EventResult::Apply => Self::start_batch(&mut state, ctx, &done_tx, BatchKind::Apply),
                EventResult::Undo => Self::start_batch(&mut state, ctx, &done_tx, BatchKind::Undo),
            }

            if state.should_exit {
                break;
            }
        }

        Ok(())
    }

    fn import(
        state: &mut AppState,
        ctx: &mut BrowserContext,
        path: PathBuf,
        replace: bool,
    ) -> Result<()> {
        let report = match import::import(
            std::slice::from_ref(&path),
            ctx.recursive,
            &ctx.settings.allowed_file_types,
        ) {
            Ok(report) => report,
            Err(e) => {
                state.add_message(MessageLevel::Error, e.to_string());
                return Ok(());
            }
        };

        for (skipped, reason) in &report.skipped {
            log::info!("skipped {}: {reason}", skipped.display());
        }

        if report.entries.is_empty() {
            state.add_message(
                MessageLevel::Warning,
                format!("No media files found in {}", path.display()),
            );
            return Ok(());
        }

        let count = report.entries.len();
        if replace {
            state.selection.clear();
            state.intents.flush();
            ctx.engine.post(Command::Init(report.entries))?;
        } else {
            ctx.engine.post(Command::Append(report.entries))?;
        }

        let mut text = format!("Imported {count} file(s)");
        if !report.skipped.is_empty() {
            text.push_str(&format!(", skipped {}", report.skipped.len()));
        }
        state.add_message(MessageLevel::Success, text);

        let folder = if path.is_dir() { Some(path) } else { path.parent().map(PathBuf::from) };
        if folder.is_some() && folder != ctx.settings.default_import_folder {
            ctx.settings.default_import_folder.clone_from(&folder);
            state.import_folder = folder;
            ctx.settings_store.save(&ctx.settings);
        }

        Ok(())
    }

    fn start_batch(
        state: &mut AppState,
        ctx: &BrowserContext,
        done_tx: &mpsc::UnboundedSender<BatchDone>,
        kind: BatchKind,
    ) {
        if state.busy || ctx.controller.is_busy() {
            state.add_message(MessageLevel::Warning, "A batch is already running");
            return;
        }

        state.flush_intents();
        state.busy = true;

        let controller = ctx.controller.clone();
        let engine = ctx.engine.clone();
        let tx = done_tx.clone();
        ctx.runtime.spawn(async move {
            let result = match kind {
                BatchKind::Apply => controller.apply(&engine).await,
                BatchKind::Undo => controller.undo().await,
            };
            if tx.send(BatchDone { kind, result }).is_err() {
                log::warn!("browser closed before the batch finished");
            }
        });
    }

    fn finish_batch(state: &mut AppState, ctx: &BrowserContext, done: BatchDone) {
        state.busy = false;
        state.can_undo = ctx.controller.can_undo();

        match done.result {
            Ok(BatchOutcome::Completed { success_count }) => {
                let persisted = match done.kind {
                    BatchKind::Apply => {
                        state.selection.clear();
                        state.add_message(
                            MessageLevel::Success,
                            format!("Renamed {success_count} file(s). Press u to undo."),
                        );
                        ctx.history.store(&ctx.controller.history())
                    }
                    BatchKind::Undo => {
                        state.add_message(
                            MessageLevel::Success,
                            format!("Restored {success_count} file(s)"),
                        );
                        ctx.history.clear()
                    }
                };
                if let Err(e) = persisted {
                    log::warn!("failed to update undo record: {e}");
                    state.add_message(MessageLevel::Warning, format!("Undo record not saved: {e}"));
                }
            }
            Ok(BatchOutcome::Failed { report, summary }) => {
                for failure in &report.errors {
                    log::warn!("{} failed for {}: {}", done.kind.label(), failure.file.display(), failure.reason);
                }
                state.add_message(
                    MessageLevel::Error,
                    output::failure_headline(done.kind.label(), report.error_count, &summary),
                );
            }
            Ok(BatchOutcome::Skipped) => {
                let text = match done.kind {
                    BatchKind::Apply => "Nothing to rename",
                    BatchKind::Undo => "Nothing to undo",
                };
                state.add_message(MessageLevel::Info, text);
            }
            Err(e) => {
                log::error!("{} failed: {e}", done.kind.label());
                state.add_message(MessageLevel::Error, e.to_string());
            }
        }
    }

    /// Render the UI, recording the geometry used for hit testing
    fn render(&self, frame: &mut Frame, state: &mut AppState, catalog: &Catalog) {
        let area = frame.area();

        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Table and tag panel
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(main_layout[0]);

        let block = Block::default().borders(Borders::ALL);
        state.table_area = rows_area(panes[0]);
        state.columns = layout_columns(block.inner(panes[0]), &state.column_sizes);
        state.tag_area = block.inner(panes[1]);
        state.visible_height = state.table_area.height as usize;
        state.adjust_scroll();

        frame.render_widget(
            EntryTable::new(state, &self.theme, state.focus == Focus::Table),
            panes[0],
        );
        frame.render_widget(
            TagPanel::new(state, catalog, &self.theme, state.focus == Focus::Tags),
            panes[1],
        );

        let messages = state.active_messages();
        frame.render_widget(
            StatusBar::new(&messages, &self.theme).with_batch(state.busy, state.can_undo),
            main_layout[1],
        );

        match state.mode {
            Mode::Normal => {}
            Mode::Help => frame.render_widget(HelpOverlay::new(&self.theme), area),
            Mode::Input => {
                if let Some((_, input)) = &state.input {
                    frame.render_widget(TextInputModal::new(input, &self.theme), area);
                }
            }
            Mode::Confirm => {
                if let Some((_, dialog)) = &state.confirm {
                    frame.render_widget(ConfirmDialog::new(dialog, &self.theme), area);
                }
            }
        }
    }
}
