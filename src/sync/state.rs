//! Dashboard View State
//!
//! In-memory state shared between the synchronizer (single writer) and the
//! renderers (readers). State transitions live here as plain methods so the
//! async loops only decide *when* they happen.

use crate::client::ClientResult;
use crate::model::{HistoryWindow, HourRange, RawReading, Reading};

/// Banner shown when the latest reading cannot be loaded
pub const BACKEND_UNREACHABLE: &str =
    "Failed to load current conditions. Make sure the backend is running.";

/// Everything the dashboard renders from
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Last good reading; kept across failed refreshes
    pub current: Option<Reading>,
    /// A latest-reading request is in flight
    pub current_loading: bool,
    /// History for the selected range, unvalidated per element
    pub history: Vec<RawReading>,
    /// The latest history request has not settled yet
    pub history_loading: bool,
    /// Range shown in the selector
    pub selected_range: HourRange,
    /// Page-level error banner
    pub error: Option<String>,
    /// Number of the most recent history request
    pub(crate) history_generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// State on mount: everything loading, nothing loaded
    pub fn new() -> Self {
        Self::with_range(HourRange::default())
    }

    pub fn with_range(selected_range: HourRange) -> Self {
        Self {
            current: None,
            current_loading: true,
            history: Vec::new(),
            history_loading: true,
            selected_range,
            error: None,
            history_generation: 0,
        }
    }

    pub fn begin_current_refresh(&mut self) {
        self.current_loading = true;
    }

    /// Apply a settled latest-reading request
    ///
    /// Failures set the banner but never clear the last good reading.
    pub fn finish_current_refresh(&mut self, result: ClientResult<Reading>) {
        match result {
            Ok(reading) => {
                self.current = Some(reading);
                self.error = None;
            }
            Err(_) => {
                self.error = Some(BACKEND_UNREACHABLE.to_string());
            }
        }
        self.current_loading = false;
    }

    /// Record a new history request and return its generation
    pub fn begin_history_request(&mut self, range: HourRange) -> u64 {
        self.selected_range = range;
        self.history_loading = true;
        self.history_generation += 1;
        self.history_generation
    }

    /// Apply a settled history request
    ///
    /// Returns `false` (and changes nothing) when a newer request has been
    /// issued since. Failures leave the list untouched and never touch the
    /// banner.
    pub fn finish_history_request(
        &mut self,
        generation: u64,
        result: ClientResult<HistoryWindow>,
    ) -> bool {
        if generation != self.history_generation {
            return false;
        }

        if let Ok(window) = result {
            self.history = window.readings;
        }
        self.history_loading = false;
        true
    }
}
