//! event-board entry point.
//!
//! Connects to the event service and runs the terminal UI.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use event_board::config::BoardConfig;
use event_board::service::BoardService;
use event_board::tui::{self, App};
use event_board::ws::{self, ConnectConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = BoardConfig::from_env()?;

    // Initialize tracing; the terminal belongs to the UI, so logs go to a file
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file));
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::info!(url = %config.server_url, "starting event-board");

    // Connection lives exactly as long as the board
    let (handle, mut events) = ws::connect(ConnectConfig::from(&config));
    let board = BoardService::new(handle, config.notification_ttl);
    let mut app = App::new(board);

    let result = tui::run(&mut app, &mut events, config.ui_tick).await;

    app.board.into_sink().close().await;
    tracing::info!("event-board stopped");

    result
}
