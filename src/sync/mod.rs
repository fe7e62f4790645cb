//! View Synchronization
//!
//! Owns the dashboard's [`ViewState`] and decides when the data client is
//! called:
//! - current conditions on mount and every [`CURRENT_REFRESH_INTERVAL`]
//! - history on mount and on every range change
//!
//! State is published through a `tokio::sync::watch` channel so any number
//! of renderers can follow it.

mod state;
mod synchronizer;

pub use state::{ViewState, BACKEND_UNREACHABLE};
pub use synchronizer::{
    MountedView, SyncConfig, ViewSynchronizer, CURRENT_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL,
};
