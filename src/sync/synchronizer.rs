//! View Synchronizer
//!
//! Drives the two refresh lifecycles of a mounted dashboard:
//!
//! - current conditions: on mount, then on a fixed interval
//! - history: on mount and whenever the selected range changes
//!
//! Both run as tokio tasks owned by [`MountedView`]; dropping the view aborts
//! them, along with any history fetches still in flight.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use super::state::ViewState;
use crate::client::WeatherApi;
use crate::model::HourRange;

/// Period of the current-conditions refresh
pub const CURRENT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest accepted refresh period
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for a mounted view
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub refresh_interval: Duration,
    pub initial_range: HourRange,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval: CURRENT_REFRESH_INTERVAL,
            initial_range: HourRange::default(),
        }
    }
}

/// Mounts dashboard views against a backend
pub struct ViewSynchronizer {
    api: Arc<dyn WeatherApi>,
    config: SyncConfig,
}

impl ViewSynchronizer {
    /// Refresh intervals below [`MIN_REFRESH_INTERVAL`] are raised to it
    pub fn new(api: Arc<dyn WeatherApi>, mut config: SyncConfig) -> Self {
        if config.refresh_interval < MIN_REFRESH_INTERVAL {
            tracing::warn!(
                requested_ms = config.refresh_interval.as_millis() as u64,
                "Refresh interval too short, using {}s",
                MIN_REFRESH_INTERVAL.as_secs()
            );
            config.refresh_interval = MIN_REFRESH_INTERVAL;
        }
        Self { api, config }
    }

    /// Start both refresh loops with fresh state
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&self) -> MountedView {
        let state = Arc::new(watch::Sender::new(ViewState::with_range(
            self.config.initial_range,
        )));
        let (range_tx, range_rx) = watch::channel(self.config.initial_range);

        tracing::info!(
            interval_secs = self.config.refresh_interval.as_secs(),
            range = %self.config.initial_range,
            "Mounting dashboard view"
        );

        let current_task = tokio::spawn(run_current_loop(
            Arc::clone(&self.api),
            Arc::clone(&state),
            self.config.refresh_interval,
        ));

        let history_task = tokio::spawn(run_history_loop(
            Arc::clone(&self.api),
            Arc::clone(&state),
            range_rx,
        ));

        MountedView {
            state,
            range_tx,
            current_task,
            history_task,
        }
    }
}

/// Handle to a live dashboard view
///
/// Owns the refresh tasks. They stop on [`MountedView::unmount`] or when the
/// handle is dropped.
pub struct MountedView {
    state: Arc<watch::Sender<ViewState>>,
    range_tx: watch::Sender<HourRange>,
    current_task: JoinHandle<()>,
    history_task: JoinHandle<()>,
}

impl MountedView {
    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Change the history range; selecting the current range is a no-op
    pub fn select_range(&self, range: HourRange) {
        let changed = self.range_tx.send_if_modified(|selected| {
            if *selected == range {
                false
            } else {
                *selected = range;
                true
            }
        });

        if changed {
            tracing::debug!(range = %range, "History range selected");
        }
    }

    /// Stop both loops and wait until they are gone
    pub async fn unmount(mut self) {
        self.current_task.abort();
        self.history_task.abort();

        // Cancelled tasks resolve to a JoinError; nothing to report
        let _ = (&mut self.current_task).await;
        let _ = (&mut self.history_task).await;

        tracing::info!("Dashboard view unmounted");
    }
}

impl Drop for MountedView {
    fn drop(&mut self) {
        self.current_task.abort();
        self.history_task.abort();
    }
}

async fn run_current_loop(
    api: Arc<dyn WeatherApi>,
    state: Arc<watch::Sender<ViewState>>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick completes immediately: that is the on-mount fetch
        ticker.tick().await;
        refresh_current(api.as_ref(), &state).await;
    }
}

async fn refresh_current(api: &dyn WeatherApi, state: &watch::Sender<ViewState>) {
    state.send_modify(ViewState::begin_current_refresh);

    let result = api.fetch_latest().await;
    match &result {
        Ok(reading) => tracing::debug!(ts = %reading.ts, "Current conditions updated"),
        Err(e) => tracing::error!(error = %e, "Error fetching current conditions"),
    }

    state.send_modify(|s| s.finish_current_refresh(result));
}

async fn run_history_loop(
    api: Arc<dyn WeatherApi>,
    state: Arc<watch::Sender<ViewState>>,
    mut range_rx: watch::Receiver<HourRange>,
) {
    let mut in_flight = JoinSet::new();

    let initial = *range_rx.borrow_and_update();
    start_history_request(&mut in_flight, &api, &state, initial);

    loop {
        tokio::select! {
            changed = range_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let range = *range_rx.borrow_and_update();
                start_history_request(&mut in_flight, &api, &state, range);
            }
            Some(joined) = in_flight.join_next() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        tracing::error!(error = %e, "History fetch task panicked");
                    }
                }
            }
        }
    }
}

/// Spawn one history fetch; its result only lands if no newer request exists
fn start_history_request(
    in_flight: &mut JoinSet<()>,
    api: &Arc<dyn WeatherApi>,
    state: &Arc<watch::Sender<ViewState>>,
    range: HourRange,
) {
    let mut generation = 0;
    state.send_modify(|s| generation = s.begin_history_request(range));

    let api = Arc::clone(api);
    let state = Arc::clone(state);

    in_flight.spawn(async move {
        let hours = range.hours();
        let result = api.fetch_history(hours).await;

        match &result {
            Ok(window) => tracing::debug!(hours, count = window.readings.len(), "History loaded"),
            Err(e) => tracing::error!(hours, error = %e, "Error fetching history"),
        }

        let applied = state.send_if_modified(|s| s.finish_history_request(generation, result));
        if !applied {
            tracing::debug!(hours, generation, "Discarding superseded history response");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, ClientResult};
    use crate::model::{HistoryWindow, RawReading, Reading};
    use crate::sync::BACKEND_UNREACHABLE;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted backend: per-range history outcomes with optional delays
    #[derive(Default)]
    struct FakeApi {
        /// `None` makes `fetch_latest` fail
        latest: Mutex<Option<Reading>>,
        latest_calls: AtomicUsize,
        /// `None` for a range makes `fetch_history` fail hard
        history: Mutex<HashMap<u32, Option<usize>>>,
        history_delay: Mutex<HashMap<u32, Duration>>,
        history_calls: Mutex<Vec<u32>>,
    }

    impl FakeApi {
        fn with_reading() -> Self {
            let api = Self::default();
            api.set_latest(Some(reading("2024-01-01T00:00:00Z", 68.0)));
            api
        }

        fn set_latest(&self, reading: Option<Reading>) {
            *self.latest.lock().unwrap() = reading;
        }

        fn set_history(&self, hours: u32, outcome: Option<usize>) {
            self.history.lock().unwrap().insert(hours, outcome);
        }

        fn delay_history(&self, hours: u32, delay: Duration) {
            self.history_delay.lock().unwrap().insert(hours, delay);
        }

        fn latest_calls(&self) -> usize {
            self.latest_calls.load(Ordering::SeqCst)
        }

        fn history_calls(&self) -> Vec<u32> {
            self.history_calls.lock().unwrap().clone()
        }
    }

    fn reading(ts: &str, temp_f: f64) -> Reading {
        Reading::new(ts, temp_f, 50.0, 1013.0)
    }

    fn readings(n: usize) -> Vec<RawReading> {
        (0..n)
            .map(|i| {
                RawReading::new(json!({
                    "ts": format!("2024-01-01T{:02}:00:00Z", i),
                    "temp_f": 60 + i,
                    "humidity": 50,
                    "pressure": 1013
                }))
            })
            .collect()
    }

    #[async_trait]
    impl WeatherApi for FakeApi {
        async fn fetch_latest(&self) -> ClientResult<Reading> {
            self.latest_calls.fetch_add(1, Ordering::SeqCst);
            self.latest
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ClientError::Backend("station offline".to_string()))
        }

        async fn fetch_history(&self, hours: u32) -> ClientResult<HistoryWindow> {
            self.history_calls.lock().unwrap().push(hours);

            let delay = self.history_delay.lock().unwrap().get(&hours).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let outcome = self.history.lock().unwrap().get(&hours).copied();
            match outcome {
                Some(Some(n)) => Ok(HistoryWindow {
                    hours,
                    count: n,
                    readings: readings(n),
                }),
                Some(None) => Err(ClientError::Request {
                    status: 500,
                    status_text: "Internal Server Error".to_string(),
                    message: "Failed to fetch history",
                }),
                None => Ok(HistoryWindow::empty(hours)),
            }
        }
    }

    fn mount(api: &Arc<FakeApi>) -> MountedView {
        let api: Arc<dyn WeatherApi> = api.clone();
        ViewSynchronizer::new(api, SyncConfig::default()).mount()
    }

    async fn wait_for(view: &MountedView, predicate: impl FnMut(&ViewState) -> bool) -> ViewState {
        let mut rx = view.subscribe();
        let state = tokio::time::timeout(Duration::from_secs(600), rx.wait_for(predicate))
            .await
            .expect("timed out waiting for view state")
            .expect("state channel closed");
        state.clone()
    }

    async fn settled(view: &MountedView) -> ViewState {
        wait_for(view, |s| !s.current_loading && !s.history_loading).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_loads_current_and_history() {
        let api = Arc::new(FakeApi::with_reading());
        api.set_history(24, Some(10));

        let view = mount(&api);
        let state = settled(&view).await;

        assert_eq!(state.current, Some(reading("2024-01-01T00:00:00Z", 68.0)));
        assert_eq!(state.history.len(), 10);
        assert_eq!(state.selected_range, HourRange::OneDay);
        assert!(state.error.is_none());
        assert_eq!(api.latest_calls(), 1);
        assert_eq!(api.history_calls(), vec![24]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_current_refreshes_on_interval() {
        let api = Arc::new(FakeApi::with_reading());
        let view = mount(&api);
        settled(&view).await;

        api.set_latest(Some(reading("2024-01-01T00:01:00Z", 70.0)));
        tokio::time::sleep(Duration::from_secs(185)).await;

        // Ticks at 0, 60, 120 and 180 seconds
        assert_eq!(api.latest_calls(), 4);
        assert_eq!(view.snapshot().current.unwrap().temp_f, 70.0);
        // History is not on the timer
        assert_eq!(api.history_calls(), vec![24]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_current_failure_keeps_last_good_reading() {
        let api = Arc::new(FakeApi::with_reading());
        let view = mount(&api);
        settled(&view).await;

        api.set_latest(None);
        let state = wait_for(&view, |s| s.error.is_some() && !s.current_loading).await;

        assert_eq!(state.error.as_deref(), Some(BACKEND_UNREACHABLE));
        assert_eq!(state.current, Some(reading("2024-01-01T00:00:00Z", 68.0)));

        api.set_latest(Some(reading("2024-01-01T00:02:00Z", 71.0)));
        let state = wait_for(&view, |s| s.error.is_none() && !s.current_loading).await;
        assert_eq!(state.current.unwrap().temp_f, 71.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_backend_on_mount() {
        let api = Arc::new(FakeApi::default());
        let view = mount(&api);

        let state = settled(&view).await;
        assert!(state.current.is_none());
        assert_eq!(state.error.as_deref(), Some(BACKEND_UNREACHABLE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_failure_does_not_raise_banner() {
        let api = Arc::new(FakeApi::with_reading());
        api.set_history(24, None);

        let view = mount(&api);
        let state = settled(&view).await;

        assert!(state.error.is_none());
        assert!(state.history.is_empty());
        assert_eq!(api.history_calls(), vec![24]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_range_refetches_history() {
        let api = Arc::new(FakeApi::with_reading());
        api.set_history(24, Some(4));
        api.set_history(6, Some(2));

        let view = mount(&api);
        settled(&view).await;

        view.select_range(HourRange::SixHours);
        let state = wait_for(&view, |s| {
            s.selected_range == HourRange::SixHours && !s.history_loading
        })
        .await;
        assert_eq!(state.history.len(), 2);

        // Re-selecting the same range is not a change
        view.select_range(HourRange::SixHours);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(api.history_calls(), vec![24, 6]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_history_response_is_discarded() {
        let api = Arc::new(FakeApi::with_reading());
        api.set_history(24, Some(9));
        api.delay_history(24, Duration::from_secs(30));
        api.set_history(6, Some(3));

        let view = mount(&api);

        // Let the slow 24h request start before switching ranges
        while api.history_calls().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        view.select_range(HourRange::SixHours);

        let state = wait_for(&view, |s| {
            s.selected_range == HourRange::SixHours && !s.history_loading
        })
        .await;
        assert_eq!(state.history.len(), 3);

        // The stale 24h response arrives afterwards and must not land
        tokio::time::sleep(Duration::from_secs(45)).await;
        let state = view.snapshot();
        assert_eq!(state.history.len(), 3);
        assert_eq!(state.selected_range, HourRange::SixHours);
        assert!(!state.history_loading);
        assert_eq!(api.history_calls(), vec![24, 6]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_refresh_interval_is_raised_to_minimum() {
        let api = Arc::new(FakeApi::with_reading());
        let shared: Arc<dyn WeatherApi> = api.clone();
        let view = ViewSynchronizer::new(
            shared,
            SyncConfig {
                refresh_interval: Duration::ZERO,
                initial_range: HourRange::OneDay,
            },
        )
        .mount();
        settled(&view).await;

        tokio::time::sleep(Duration::from_millis(3500)).await;

        // Ticks at 0, 1, 2 and 3 seconds; the loop is still alive
        assert_eq!(api.latest_calls(), 4);
        assert!(view.snapshot().error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_stops_polling() {
        let api = Arc::new(FakeApi::with_reading());
        let view = mount(&api);
        settled(&view).await;

        view.unmount().await;
        tokio::time::sleep(Duration::from_secs(600)).await;

        assert_eq!(api.latest_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer_and_in_flight_history() {
        let api = Arc::new(FakeApi::with_reading());
        api.delay_history(24, Duration::from_secs(30));
        api.set_history(24, Some(5));

        let view = mount(&api);
        let rx = view.subscribe();
        while api.history_calls().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        drop(view);
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(api.latest_calls(), 1);
        // The aborted fetch never published its window
        assert!(rx.borrow().history.is_empty());
    }
}
