//! # Weatherdash
//!
//! Weather Station Dashboard - polls a weather-station backend for the latest
//! reading and a bounded history window, and renders current conditions, a
//! rolling daily summary and history charts.
//!
//! ## Modules
//!
//! - [`client`]: HTTP data client for `/latest` and `/history`
//! - [`sync`]: view state and its refresh lifecycles
//! - [`render`]: pure panel models and the terminal frame
//! - [`model`]: readings, history windows and hour ranges
//! - [`config`]: TOML + environment configuration, base-URL resolution
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use weatherdash::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = DataClient::new(ClientConfig::from_backend(&config.backend)?)?;
//!
//!     let view = ViewSynchronizer::new(Arc::new(client), SyncConfig::default()).mount();
//!     let mut updates = view.subscribe();
//!
//!     // Wait for the first state change and print it
//!     updates.changed().await?;
//!     println!("{}", render_frame(&updates.borrow(), "http://localhost:8000"));
//!
//!     view.select_range(HourRange::SixHours);
//!     view.unmount().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod logging;
pub mod model;
pub mod render;
pub mod sync;

// Re-export top-level types for convenience
pub use client::{ClientConfig, ClientError, ClientResult, DataClient, WeatherApi};

pub use config::{BackendConfig, BackendMode, Config, ConfigError, LoggingConfig};

pub use model::{
    ComfortIndex, HistoryWindow, HourRange, PressureTrend, RawReading, Reading, ValidationError,
};

pub use render::{render_frame, render_frame_with, FrameStyle};

pub use sync::{
    MountedView, SyncConfig, ViewState, ViewSynchronizer, BACKEND_UNREACHABLE,
    CURRENT_REFRESH_INTERVAL,
};
