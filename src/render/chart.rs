//! History chart preparation
//!
//! Turns the raw history list into plot-ready points and text sparklines.
//! Every element is re-validated here: anything without the required fields
//! or with an unparseable timestamp is dropped with a warning, never shown.

use chrono::{DateTime, Utc};

use crate::model::{celsius_to_fahrenheit, RawReading};
use crate::sync::ViewState;

/// Glyphs for sparklines, lowest to highest
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Smallest value span a sparkline is scaled over
const MIN_DATA_RANGE: f64 = 0.1;

/// One plotted sample
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub time: DateTime<Utc>,
    pub temp_f: f64,
    /// Humidity-sensor temperature, converted to °F
    pub temp_from_humidity_f: Option<f64>,
    /// Pressure-sensor temperature, converted to °F
    pub temp_from_pressure_f: Option<f64>,
    pub humidity: f64,
    pub pressure: f64,
}

impl ChartPoint {
    /// Axis label, e.g. `Jan 1 14:05`
    pub fn label(&self) -> String {
        self.time.format("%b %-d %H:%M").to_string()
    }
}

/// Build chart points from a history list, preserving backend order
pub fn chart_points(history: &[RawReading]) -> Vec<ChartPoint> {
    history
        .iter()
        .filter_map(|raw| match raw.renderable() {
            Ok(reading) => {
                let time = reading.timestamp()?;
                Some(ChartPoint {
                    time,
                    temp_f: reading.temp_f,
                    temp_from_humidity_f: reading.temp_from_humidity.map(celsius_to_fahrenheit),
                    temp_from_pressure_f: reading.temp_from_pressure.map(celsius_to_fahrenheit),
                    humidity: reading.humidity,
                    pressure: reading.pressure,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Invalid reading found, skipping");
                None
            }
        })
        .collect()
}

/// Value span of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesBounds {
    pub min: f64,
    pub max: f64,
}

impl SeriesBounds {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut iter = values.iter().copied().filter(|v| v.is_finite());
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self { min, max })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Render `values` as a sparkline at most `width` characters wide
///
/// Longer series are averaged into `width` buckets.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let Some(bounds) = SeriesBounds::from_values(values) else {
        return String::new();
    };

    let span = bounds.range().max(MIN_DATA_RANGE);
    let top = (SPARK_LEVELS.len() - 1) as f64;

    downsample(values, width)
        .into_iter()
        .map(|v| {
            let level = (((v - bounds.min) / span) * top).round().clamp(0.0, top);
            SPARK_LEVELS[level as usize]
        })
        .collect()
}

fn downsample(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width {
        return values.to_vec();
    }

    (0..width)
        .map(|bucket| {
            let start = bucket * values.len() / width;
            let end = ((bucket + 1) * values.len() / width).max(start + 1);
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// History section of the dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryPanel {
    Loading { hours: u32 },
    Empty,
    Ready { hours: u32, points: Vec<ChartPoint> },
}

impl HistoryPanel {
    pub fn from_state(state: &ViewState) -> Self {
        let hours = state.selected_range.hours();
        if state.history_loading {
            return HistoryPanel::Loading { hours };
        }

        let points = chart_points(&state.history);
        if points.is_empty() {
            HistoryPanel::Empty
        } else {
            HistoryPanel::Ready { hours, points }
        }
    }

    /// Status line under the section title
    pub fn description(&self) -> String {
        match self {
            HistoryPanel::Loading { hours } => format!("Loading {} hour history...", hours),
            HistoryPanel::Empty => "No historical data available".to_string(),
            HistoryPanel::Ready { hours, points } => {
                format!("Last {} hours ({} readings)", hours, points.len())
            }
        }
    }
}
