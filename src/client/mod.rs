//! Weather-Station Data Client
//!
//! Translates the two logical operations of the dashboard into HTTP calls
//! against the backend and normalizes the results.
//!
//! ## Contract
//!
//! - `fetch_latest`: any failure (status, `error` field, bad shape) is an error
//! - `fetch_history`: an `error` field or a missing `readings` array degrades
//!   to an empty window; only transport-level failures are errors
//!
//! The [`WeatherApi`] trait is the seam the view synchronizer depends on.

mod error;
mod http;

pub use error::{ClientError, ClientResult};
pub use http::{ClientConfig, DataClient};

use async_trait::async_trait;

use crate::model::{HistoryWindow, Reading};

/// Operations the dashboard needs from a weather-station backend
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Latest validated reading
    async fn fetch_latest(&self) -> ClientResult<Reading>;

    /// History for the last `hours`; `hours` is passed through unchanged
    async fn fetch_history(&self, hours: u32) -> ClientResult<HistoryWindow>;
}
