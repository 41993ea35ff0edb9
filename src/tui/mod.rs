//! Terminal front-end: form, connection indicator, notification stack and
//! event list, drawn with `ratatui` on a `crossterm` backend.

pub mod app;
pub mod ui;

use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event as CrosstermEvent};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::service::CommandSink;
use crate::ws::ClientEvent;

pub use app::{App, Focus};

/// Raw-mode alternate screen that is restored when dropped, including on
/// early returns and panics unwinding through the loop.
#[derive(Debug)]
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = std::io::stdout().execute(EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = std::io::stdout().execute(LeaveAlternateScreen);
    }
}

/// Runs the UI until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to.
pub async fn run<S: CommandSink>(
    app: &mut App<S>,
    events: &mut mpsc::Receiver<ClientEvent>,
    tick: Duration,
) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
    let result = run_loop(&mut terminal, app, events, tick).await;
    terminal.show_cursor()?;
    result
}

async fn run_loop<S: CommandSink>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<S>,
    events: &mut mpsc::Receiver<ClientEvent>,
    tick: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let has_crossterm_event = tokio::task::block_in_place(|| event::poll(tick))?;
        if has_crossterm_event
            && let CrosstermEvent::Key(key) = tokio::task::block_in_place(event::read)?
        {
            app.handle_key(key);
        }

        // Drain connection events in arrival order
        while let Ok(event) = events.try_recv() {
            app.on_client_event(event);
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
