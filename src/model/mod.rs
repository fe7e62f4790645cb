//! Weather Data Model
//!
//! Typed values exchanged with the weather-station backend:
//! - `Reading`: validated current conditions
//! - `RawReading` / `HistoryWindow`: history as delivered, validated lazily
//! - `HourRange`: the selectable look-back windows

mod error;
mod history;
mod range;
mod reading;

pub use error::ValidationError;
pub use history::HistoryWindow;
pub use range::HourRange;
pub use reading::{
    celsius_to_fahrenheit, fahrenheit_to_celsius, parse_timestamp, ComfortIndex, PressureTrend,
    RawReading, Reading,
};
