//! Plain-text dashboard frame
//!
//! Composes the panels into one string the dashboard binary prints after
//! every state change.

use std::fmt::Write;

use crate::model::HourRange;
use crate::sync::ViewState;

use super::chart::{sparkline, ChartPoint, HistoryPanel, SeriesBounds};
use super::current::CurrentPanel;
use super::indicator::Color;
use super::summary::SummaryPanel;

const TITLE: &str = "Weather Station";
const SUBTITLE: &str = "Real-time environmental monitoring dashboard";

/// Clear screen and home the cursor
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Frame rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStyle {
    /// Emit ANSI colors
    pub ansi: bool,
    /// Sparkline width in characters
    pub chart_width: usize,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            ansi: true,
            chart_width: 60,
        }
    }
}

/// Render the whole dashboard with default styling
pub fn render_frame(state: &ViewState, base_url: &str) -> String {
    render_frame_with(state, base_url, FrameStyle::default())
}

pub fn render_frame_with(state: &ViewState, base_url: &str, style: FrameStyle) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", heading(TITLE, style));
    let _ = writeln!(out, "{}", SUBTITLE);
    let _ = writeln!(out);

    if let Some(error) = &state.error {
        let _ = writeln!(out, "{}", paint(&format!("! {}", error), Color::Red, style));
        let _ = writeln!(out, "  Backend API: {}", base_url);
        let _ = writeln!(out);
    }

    section(&mut out, "Today's Summary", style);
    for line in SummaryPanel::from_state(state).lines() {
        let _ = writeln!(out, "  {}", line);
    }
    let _ = writeln!(out);

    section(&mut out, "Current Conditions", style);
    for line in CurrentPanel::from_state(state).lines(style.ansi) {
        let _ = writeln!(out, "  {}", line);
    }
    let _ = writeln!(out);

    section(&mut out, "Historical Data", style);
    let _ = writeln!(out, "  Time range: {}", range_selector(state.selected_range));

    let history = HistoryPanel::from_state(state);
    let _ = writeln!(out, "  {}", history.description());
    if let HistoryPanel::Ready { points, .. } = &history {
        let series = |value: fn(&ChartPoint) -> Option<f64>| -> Vec<f64> {
            points.iter().filter_map(value).collect()
        };

        chart(&mut out, "Temperature", "°F", &series(|p| Some(p.temp_f)), style);
        // Sensor-derived estimates are plotted only when the backend sends them
        chart(&mut out, "Temp from humidity", "°F", &series(|p| p.temp_from_humidity_f), style);
        chart(&mut out, "Temp from pressure", "°F", &series(|p| p.temp_from_pressure_f), style);
        chart(&mut out, "Humidity", "%", &series(|p| Some(p.humidity)), style);
        chart(&mut out, "Pressure", " hPa", &series(|p| Some(p.pressure)), style);
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            let _ = writeln!(out, "  {} .. {}", first.label(), last.label());
        }
    }

    out
}

/// Range labels with the selected one bracketed, each keyed by its hour value
pub fn range_selector(selected: HourRange) -> String {
    HourRange::ALL
        .iter()
        .map(|range| {
            if *range == selected {
                format!("[{}]", range.label())
            } else {
                format!("{}:{}", range.hours(), range.label())
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Range line plus sparkline; series with no values are skipped
fn chart(out: &mut String, title: &str, unit: &str, values: &[f64], style: FrameStyle) {
    let Some(bounds) = SeriesBounds::from_values(values) else {
        return;
    };

    let _ = writeln!(
        out,
        "  {:<12} {:.1}{unit} .. {:.1}{unit}",
        title,
        bounds.min,
        bounds.max,
        unit = unit
    );
    let _ = writeln!(
        out,
        "  {}",
        paint(&sparkline(values, style.chart_width), Color::Cyan, style)
    );
}

fn section(out: &mut String, title: &str, style: FrameStyle) {
    let _ = writeln!(out, "{}", heading(title, style));
}

fn heading(text: &str, style: FrameStyle) -> String {
    if style.ansi {
        format!("\x1b[1m{}\x1b[0m", text)
    } else {
        text.to_string()
    }
}

fn paint(text: &str, color: Color, style: FrameStyle) -> String {
    if style.ansi {
        color.paint(text)
    } else {
        text.to_string()
    }
}
