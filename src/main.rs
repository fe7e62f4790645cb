//! Weatherdash
//!
//! Terminal dashboard for a weather-station backend. Redraws on every state
//! change; type an hour value (1, 6, 12, 24, 48, 72, 168) to change the
//! history range, `q` to quit.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use weatherdash::config::Config;
use weatherdash::render::terminal::CLEAR_SCREEN;
use weatherdash::{
    logging, render_frame_with, ClientConfig, DataClient, FrameStyle, HourRange, SyncConfig,
    ViewState, ViewSynchronizer, WeatherApi, CURRENT_REFRESH_INTERVAL,
};

#[derive(Parser)]
#[command(name = "weatherdash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live weather-station dashboard for the terminal")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL; overrides config and environment
    #[arg(long)]
    api_url: Option<String>,

    /// Initial history range in hours
    #[arg(long, default_value = "24")]
    hours: u32,

    /// Disable ANSI colors and screen clearing
    #[arg(long)]
    no_color: bool,
}

/// A line typed on stdin
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Range(HourRange),
    Quit,
    Redraw,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "" => Command::Redraw,
            "q" | "quit" | "exit" => Command::Quit,
            other => other
                .parse::<u32>()
                .ok()
                .and_then(|hours| HourRange::try_from(hours).ok())
                .map(Command::Range)
                .unwrap_or_else(|| Command::Unknown(other.to_string())),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = args.api_url {
        config.backend.url = Some(url);
    }

    logging::init(&config.logging);

    let initial_range = HourRange::try_from(args.hours).map_err(anyhow::Error::msg)?;
    let client = DataClient::new(ClientConfig::from_backend(&config.backend)?)
        .context("Failed to build HTTP client")?;
    let base_url = client.base_url().to_string();

    tracing::info!(base_url = %base_url, "Weatherdash v{}", env!("CARGO_PKG_VERSION"));

    let api: Arc<dyn WeatherApi> = Arc::new(client);
    let view = ViewSynchronizer::new(
        api,
        SyncConfig {
            refresh_interval: CURRENT_REFRESH_INTERVAL,
            initial_range,
        },
    )
    .mount();

    let style = FrameStyle {
        ansi: !args.no_color,
        ..FrameStyle::default()
    };

    let mut updates = view.subscribe();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let initial = updates.borrow_and_update().clone();
    draw(&initial, &base_url, style)?;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                draw(&state, &base_url, style)?;
            }
            line = stdin.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match Command::parse(&line) {
                        Command::Quit => break,
                        Command::Range(range) => view.select_range(range),
                        Command::Redraw => draw(&view.snapshot(), &base_url, style)?,
                        Command::Unknown(input) => {
                            tracing::warn!(input = %input, "Unknown command");
                        }
                    },
                    None => {
                        // Keep running without input, e.g. under a service manager
                        tracing::debug!("stdin closed");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    view.unmount().await;
    Ok(())
}

fn draw(state: &ViewState, base_url: &str, style: FrameStyle) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    if style.ansi {
        write!(stdout, "{}", CLEAR_SCREEN)?;
    }
    write!(stdout, "{}", render_frame_with(state, base_url, style))?;
    writeln!(stdout)?;
    write!(stdout, "Range (1/6/12/24/48/72/168), q to quit> ")?;
    stdout.flush()
}
