use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use minicade::app::App;
use minicade::config::{self, Cli, Config, MAX_TICK_MS};
use minicade::event::{Event, EventHandler};
use minicade::ui;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    if let Some(path) = &config.log_file {
        config::init_logging(path)?;
    }
    tracing::info!(seed = ?config.seed, tick_ms = config.tick_ms, skip_intro = config.skip_intro, "starting minicade");

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let result = run(&mut terminal, &config);

    // Restore terminal
    disable_raw_mode().context("disabling raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leaving alternate screen")?;
    terminal.show_cursor().context("showing cursor")?;

    if let Err(err) = &result {
        tracing::warn!(%err, "minicade exited with an error");
    }
    result
}

fn run(terminal: &mut Tui, config: &Config) -> Result<()> {
    terminal.clear()?;

    let mut app = App::new(config);
    let event_handler = EventHandler::new(config.tick_ms);
    let max_step = Duration::from_millis(MAX_TICK_MS);

    // Main loop
    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        match event_handler.next()? {
            // a stall (suspend, slow draw) must not replay seconds of play at once
            Event::Tick(elapsed) => app.on_tick(elapsed.min(max_step)),
            Event::Key(key) => app.on_key(key),
            Event::Resize => {}
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("minicade closed");
    Ok(())
}
