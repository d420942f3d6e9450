use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod conversation;
mod forms;
mod handler;
mod responder;
mod tui;
mod ui;

use app::App;
use config::Config;

#[derive(Parser)]
#[command(name = "mindmate")]
#[command(about = "Terminal support chat for Soulklinic's MindMate assistant")]
#[command(version)]
struct Cli {
    /// Seed the reply randomness for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Write tracing output to this file (overrides the config file)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let log_file = cli.log_file.clone().or_else(|| config.log_file.clone());
    init_logging(log_file.as_deref())?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting session");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(config, cli.seed);

    let result = run(&mut terminal, &mut events, &mut app).await;

    // A reply still in flight must never mutate state after teardown.
    app.abort_pending_reply();
    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, events: &mut tui::EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;
        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    info!("session ended");
    Ok(())
}

/// Tracing goes to a file when one is configured; the TUI owns stderr.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
