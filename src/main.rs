//! reinstate - SR-22 / FR-44 quote intake
//!
//! Runs the terminal front end against the configured submission store.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use reinstate::application::App;
use reinstate::infrastructure::{init_file_logging, AppConfig, SessionIdentity, StoreBackend};
use reinstate::presentation::{render_ui, InputHandler};

#[derive(Parser, Debug)]
#[command(name = "reinstate", version, about = "SR-22 / FR-44 quote intake and lead tracking")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "reinstate.toml")]
    config: PathBuf,

    /// Override the configured store backend
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,

    /// Sign in as this user id
    #[arg(short, long)]
    user: Option<String>,

    /// Grant admin rights to the signed-in user
    #[arg(long, requires = "user")]
    admin: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Entry point for the reinstate terminal application.
///
/// Loads configuration, opens the store, then hands the terminal to the
/// event loop until the user quits.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(backend) = cli.store {
        config.store.backend = backend;
    }
    if let Some(log_file) = cli.log_file {
        config.log.file = Some(log_file);
    }

    if let Some(log_file) = &config.log.file {
        init_file_logging(log_file, &config.log.level)
            .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;
    }

    let store = config.open_store().context("opening submission store")?;
    let identity = SessionIdentity::from_flags(cli.user, cli.admin);
    let mut app = App::new(store, &identity, config.export.path.clone());
    info!(backend = ?config.store.backend, signed_in = app.identity().is_some(), "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(%err, "terminal loop failed");
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Continues until Ctrl+C, or `q` while no text field has focus.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                    KeyCode::Char('q') if InputHandler::quit_key_enabled(app) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
