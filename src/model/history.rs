//! History windows returned by `/history`

use serde_json::Value;

use super::reading::RawReading;

/// A bounded, ordered run of readings for a look-back period
///
/// Readings keep the backend's order and are not validated individually.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryWindow {
    pub hours: u32,
    pub count: usize,
    pub readings: Vec<RawReading>,
}

impl HistoryWindow {
    /// The soft-degraded result: `{hours, count: 0, readings: []}`
    pub fn empty(hours: u32) -> Self {
        Self {
            hours,
            count: 0,
            readings: Vec::new(),
        }
    }

    /// Build a window from a decoded response body
    ///
    /// Returns `None` when `readings` is missing or not an array. A missing
    /// `hours` falls back to the requested value and a missing `count` to the
    /// number of elements.
    pub fn from_body(requested_hours: u32, body: Value) -> Option<Self> {
        let Value::Object(mut object) = body else {
            return None;
        };

        let readings = match object.remove("readings") {
            Some(Value::Array(items)) => items.into_iter().map(RawReading::new).collect::<Vec<_>>(),
            _ => return None,
        };

        let hours = object
            .get("hours")
            .and_then(Value::as_u64)
            .and_then(|h| u32::try_from(h).ok())
            .unwrap_or(requested_hours);

        let count = object
            .get("count")
            .and_then(Value::as_u64)
            .map(|c| c as usize)
            .unwrap_or(readings.len());

        Some(Self {
            hours,
            count,
            readings,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
