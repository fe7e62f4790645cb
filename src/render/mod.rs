//! Dashboard Rendering
//!
//! Pure functions of [`ViewState`](crate::sync::ViewState). Nothing here
//! fails: bad history elements are filtered out and unknown labels fall back
//! to a neutral indicator.

pub mod chart;
pub mod current;
pub mod indicator;
pub mod summary;
pub mod terminal;

pub use chart::{chart_points, sparkline, ChartPoint, HistoryPanel};
pub use current::CurrentPanel;
pub use indicator::{comfort_indicator, trend_indicator, Indicator};
pub use summary::SummaryPanel;
pub use terminal::{render_frame, render_frame_with, FrameStyle};
