//! Application runner and event loop.
//!
//! Handles terminal setup/teardown and the main loop. The loop waits for
//! input with the `timeout` setting; a timeout is the idle tick that polls
//! the server for status.

use std::io;
use std::time::Duration;

use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::cli::Cli;
use crate::client::MpcClient;
use crate::config::load_config;
use crate::error::Result;
use crate::events::{next_event, AppEvent};
use crate::logging;

use super::{App, Launch};

const DEFAULT_LOG_LEVEL: &str = "info";

/// Entry point: load config, set up logging and the terminal, run the loop.
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref());
    let log_file = cli.log_file.clone().or_else(|| config.log.file.clone());
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.log.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    // Held until the loop exits so buffered log lines are flushed.
    let _log_guard = logging::init(log_file.as_deref(), &log_level)?;

    let launch = Launch {
        host: cli.host,
        port: cli.port,
        rc: cli.rc,
    };
    let mut app = App::new(&config, &launch, Box::new(MpcClient::default()));

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("exiting");
    result
}

/// Main event loop: process events until quit.
fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    terminal.clear()?;
    terminal.draw(|frame| super::render::render(app, frame))?;

    while !app.should_quit() {
        let timeout = Duration::from_millis(app.session.services.settings.timeout_ms().max(1));
        match next_event(timeout)? {
            AppEvent::Input(key) => app.on_key(&key),
            AppEvent::Resize => app.on_resize(),
            AppEvent::Tick => app.on_tick(),
        }

        if app.session.services.refresh_requested {
            terminal.clear()?;
            app.session.services.refresh_requested = false;
        }

        terminal.draw(|frame| super::render::render(app, frame))?;
    }
    Ok(())
}
