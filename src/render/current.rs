//! Current conditions panel

use crate::model::Reading;
use crate::sync::ViewState;

use super::indicator::{comfort_indicator, trend_indicator, Indicator};

/// Display layout for "Last updated"
const UPDATED_FORMAT: &str = "%b %-d, %Y, %-I:%M:%S %p";

/// Current conditions, ready to print
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub updated: String,
    pub temp_f: f64,
    pub temp_c: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub dew_point_f: Option<f64>,
    pub comfort: Indicator,
    pub trend: Indicator,
    pub trend_3h: Option<f64>,
    pub trend_6h: Option<f64>,
    pub cpu_temp: Option<f64>,
}

impl From<&Reading> for CurrentView {
    fn from(reading: &Reading) -> Self {
        let updated = reading
            .timestamp()
            .map(|t| t.format(UPDATED_FORMAT).to_string())
            .unwrap_or_else(|| reading.ts.clone());

        Self {
            updated,
            temp_f: reading.temp_f,
            temp_c: reading.celsius(),
            humidity: reading.humidity,
            pressure: reading.pressure,
            dew_point_f: reading.dew_point_f,
            comfort: comfort_indicator(reading.comfort_index.as_deref()),
            trend: trend_indicator(reading.pressure_trend_label.as_deref()),
            trend_3h: reading.pressure_trend_3h,
            trend_6h: reading.pressure_trend_6h,
            cpu_temp: reading.cpu_temp,
        }
    }
}

/// Current conditions section of the dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentPanel {
    Loading,
    NoData,
    Ready(CurrentView),
}

impl CurrentPanel {
    /// A refresh in flight keeps showing the last good reading
    pub fn from_state(state: &ViewState) -> Self {
        match &state.current {
            Some(reading) => CurrentPanel::Ready(CurrentView::from(reading)),
            None if state.current_loading => CurrentPanel::Loading,
            None => CurrentPanel::NoData,
        }
    }

    pub fn lines(&self, ansi: bool) -> Vec<String> {
        match self {
            CurrentPanel::Loading => vec!["Loading...".to_string()],
            CurrentPanel::NoData => vec!["No data available".to_string()],
            CurrentPanel::Ready(view) => {
                let mut lines = vec![
                    format!("Last updated: {}", view.updated),
                    format!(
                        "{:<12} {:.1}°F ({:.1}°C)",
                        "Temperature", view.temp_f, view.temp_c
                    ),
                    format!("{:<12} {:.1}%", "Humidity", view.humidity),
                    format!(
                        "{:<12} {:.1} hPa  {}{}",
                        "Pressure",
                        view.pressure,
                        view.trend.display(ansi),
                        trend_deltas(view.trend_3h, view.trend_6h)
                    ),
                ];

                if let Some(dew_point) = view.dew_point_f {
                    lines.push(format!("{:<12} {:.1}°F", "Dew point", dew_point));
                }
                lines.push(format!("{:<12} {}", "Comfort", view.comfort.display(ansi)));
                if let Some(cpu) = view.cpu_temp {
                    lines.push(format!("{:<12} {:.1}°C", "CPU", cpu));
                }
                lines
            }
        }
    }
}

fn trend_deltas(delta_3h: Option<f64>, delta_6h: Option<f64>) -> String {
    match (delta_3h, delta_6h) {
        (None, None) => String::new(),
        (d3, d6) => {
            let fmt = |d: Option<f64>| d.map(|v| format!("{:+.1}", v)).unwrap_or_else(|| "--".to_string());
            format!(" (3h {}, 6h {})", fmt(d3), fmt(d6))
        }
    }
}
