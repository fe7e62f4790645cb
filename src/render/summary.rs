//! Daily summary panel: rolling statistics since local midnight

use crate::model::Reading;
use crate::sync::ViewState;

/// Daily figures as the backend computed them
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub high: Option<f64>,
    pub avg: Option<f64>,
    pub low: f64,
    /// `high - low`, when both are known
    pub range: Option<f64>,
    pub humidity_avg: Option<f64>,
    pub pressure_avg: Option<f64>,
}

impl DailyStats {
    /// `None` until the backend has a daily minimum
    pub fn from_reading(reading: &Reading) -> Option<Self> {
        let low = reading.daily_temp_min?;
        let high = reading.daily_temp_max;

        Some(Self {
            high,
            avg: reading.daily_temp_avg,
            low,
            range: high.map(|h| h - low),
            humidity_avg: reading.daily_humidity_avg,
            pressure_avg: reading.daily_pressure_avg,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryPanel {
    Loading,
    Accumulating,
    Ready(DailyStats),
}

impl SummaryPanel {
    pub fn from_state(state: &ViewState) -> Self {
        match &state.current {
            None if state.current_loading => SummaryPanel::Loading,
            None => SummaryPanel::Accumulating,
            Some(reading) => DailyStats::from_reading(reading)
                .map(SummaryPanel::Ready)
                .unwrap_or(SummaryPanel::Accumulating),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            SummaryPanel::Loading => vec!["Loading...".to_string()],
            SummaryPanel::Accumulating => vec!["Accumulating data...".to_string()],
            SummaryPanel::Ready(stats) => {
                let mut lines = Vec::new();
                if let Some(high) = stats.high {
                    lines.push(format!("{:<12} {:.1}°F", "High", high));
                }
                if let Some(avg) = stats.avg {
                    lines.push(format!("{:<12} {:.1}°F", "Avg", avg));
                }
                lines.push(format!("{:<12} {:.1}°F", "Low", stats.low));
                if let Some(range) = stats.range {
                    lines.push(format!("{:<12} {:.1}°F", "Range", range));
                }
                lines.push(format!(
                    "{:<12} {}",
                    "Humidity",
                    average_or_calculating(stats.humidity_avg, "%")
                ));
                lines.push(format!(
                    "{:<12} {}",
                    "Pressure",
                    average_or_calculating(stats.pressure_avg, " hPa")
                ));
                lines
            }
        }
    }
}

fn average_or_calculating(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{} avg", v, unit),
        None => "Calculating...".to_string(),
    }
}
