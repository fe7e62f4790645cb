//! Weatherdash CLI
//!
//! One-shot commands against a weather-station backend:
//! - Show the latest reading
//! - Show a history window
//! - Print the resolved backend URL
//! - Generate a default config file

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use weatherdash::config::{generate_default_config, Config};
use weatherdash::render::{comfort_indicator, trend_indicator};
use weatherdash::{logging, ClientConfig, ClientError, DataClient, HourRange, Reading, WeatherApi};

#[derive(Parser)]
#[command(name = "weatherdash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query a weather-station backend from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (default: resolved from config and environment)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the latest reading
    Latest,

    /// Show readings for a look-back window
    History {
        /// Hours to look back (passed to the backend unchanged)
        #[arg(long, default_value = "24")]
        hours: u32,
        /// Only print the last N readings
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the resolved backend URL
    Resolve,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.backend.url = Some(url.clone());
    }
    logging::init(&config.logging);

    match cli.command {
        Commands::Latest => {
            let client = connect(&config)?;
            let reading = match client.fetch_latest().await {
                Ok(reading) => reading,
                Err(e) => fail(&client, e),
            };

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reading)?),
                OutputFormat::Table => print_reading(&reading),
            }
        }

        Commands::History { hours, limit } => {
            if HourRange::try_from(hours).is_err() {
                tracing::warn!(hours, "Requesting a range the dashboard does not offer");
            }

            let client = connect(&config)?;
            let window = match client.fetch_history(hours).await {
                Ok(window) => window,
                Err(e) => fail(&client, e),
            };

            let skip = limit
                .map(|n| window.readings.len().saturating_sub(n))
                .unwrap_or(0);

            match cli.format {
                OutputFormat::Json => {
                    let readings = &window.readings[skip..];
                    println!("{}", serde_json::to_string_pretty(readings)?);
                }
                OutputFormat::Table => {
                    if window.is_empty() {
                        println!("No historical data available for the last {} hours.", hours);
                        return Ok(());
                    }

                    println!(
                        "History: last {} hours, {} readings",
                        window.hours, window.count
                    );
                    println!();
                    println!(
                        "{:<26} {:>8} {:>10} {:>10}",
                        "Timestamp", "Temp °F", "Humidity", "Pressure"
                    );
                    println!("{}", "-".repeat(57));

                    let mut invalid = 0;
                    for raw in &window.readings[skip..] {
                        match raw.renderable() {
                            Ok(r) => println!(
                                "{:<26} {:>8.1} {:>9.1}% {:>10.1}",
                                r.ts, r.temp_f, r.humidity, r.pressure
                            ),
                            Err(_) => invalid += 1,
                        }
                    }

                    if invalid > 0 {
                        println!();
                        println!("({} invalid readings skipped)", invalid);
                    }
                }
            }
        }

        Commands::Resolve => {
            let base_url = config.backend.resolve_base_url()?;
            match cli.format {
                OutputFormat::Json => {
                    let body = serde_json::json!({
                        "base_url": base_url,
                        "mode": config.backend.mode.as_str(),
                        "page_origin": config.backend.page_origin,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Table => println!("{}", base_url),
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn connect(config: &Config) -> anyhow::Result<DataClient> {
    let client_config = ClientConfig::from_backend(&config.backend)?;
    Ok(DataClient::new(client_config)?)
}

fn fail(client: &DataClient, error: ClientError) -> ! {
    eprintln!("Error: {}", error);
    if error.is_request_level() {
        eprintln!();
        eprintln!("Cannot reach the weather-station backend at {}", client.base_url());
        eprintln!("Make sure the backend is running, or pass --api-url.");
    }
    std::process::exit(1);
}

fn print_reading(reading: &Reading) {
    println!("Last updated: {}", reading.ts);
    println!();
    println!("{:<16} {:.1}°F ({:.1}°C)", "Temperature", reading.temp_f, reading.celsius());
    println!("{:<16} {:.1}%", "Humidity", reading.humidity);
    println!("{:<16} {:.1} hPa", "Pressure", reading.pressure);
    println!(
        "{:<16} {}",
        "Trend",
        trend_indicator(reading.pressure_trend_label.as_deref()).display(false)
    );
    println!(
        "{:<16} {}",
        "Comfort",
        comfort_indicator(reading.comfort_index.as_deref()).display(false)
    );

    if let Some(dew_point) = reading.dew_point_f {
        println!("{:<16} {:.1}°F", "Dew point", dew_point);
    }
    if let (Some(min), Some(max)) = (reading.daily_temp_min, reading.daily_temp_max) {
        println!("{:<16} {:.1}°F / {:.1}°F", "Today low/high", min, max);
    }
}
