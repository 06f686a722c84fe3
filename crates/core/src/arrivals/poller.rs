//! Live arrival polling for the selected stop.
//!
//! Selecting a stop starts two independent loops: a refresh loop that issues
//! one arrivals fetch per interval, and a one-second countdown loop that only
//! drives the "next refresh in N" display. Fetches run as their own tasks and
//! may overlap. Each is tagged with the selection epoch it was issued under,
//! and its result is dropped if the selection has moved on since.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use starbus_transit::{
    ArrivalList, ArrivalRecord, Stop, StopIdentifier, TransitDataSource, TransitError,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::arrivals::reorder::reorder;

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollerConfig {
    pub refresh_interval: Duration,
    /// Value the display countdown starts from and wraps back to
    pub countdown_ceiling: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(15),
            countdown_ceiling: 15,
        }
    }
}

/// What the arrivals panel currently shows
#[derive(Clone, Debug, PartialEq)]
pub enum ArrivalFeed {
    /// Selected, first response not in yet
    Pending,
    Loaded(ArrivalList),
    /// The provider has no arrivals for this stop
    NoData,
    /// The last fetch failed; earlier data is not kept
    Failed(String),
}

impl ArrivalFeed {
    pub fn records(&self) -> &[ArrivalRecord] {
        match self {
            Self::Loaded(list) => &list.records,
            _ => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectionState {
    pub stop: Option<Stop>,
    pub arrivals: ArrivalFeed,
    pub countdown: u32,
    pub overlay_open: bool,
    /// Bumped on every select and clear
    pub epoch: u64,
}

impl SelectionState {
    fn idle(countdown: u32) -> Self {
        Self {
            stop: None,
            arrivals: ArrivalFeed::Pending,
            countdown,
            overlay_open: false,
            epoch: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stop.is_some()
    }

    pub fn selected_id(&self) -> Option<&StopIdentifier> {
        self.stop.as_ref().map(|stop| &stop.id)
    }
}

/// Both loops of one selection; dropping it stops them.
struct PollTimers {
    refresh: JoinHandle<()>,
    countdown: JoinHandle<()>,
}

impl Drop for PollTimers {
    fn drop(&mut self) {
        self.refresh.abort();
        self.countdown.abort();
    }
}

pub struct ArrivalPoller {
    source: Arc<dyn TransitDataSource>,
    config: PollerConfig,
    state: Arc<watch::Sender<SelectionState>>,
    timers: Mutex<Option<PollTimers>>,
}

impl ArrivalPoller {
    pub fn new(source: Arc<dyn TransitDataSource>, config: PollerConfig) -> Self {
        let (state, _) = watch::channel(SelectionState::idle(config.countdown_ceiling));
        Self {
            source,
            config,
            state: Arc::new(state),
            timers: Mutex::new(None),
        }
    }

    pub fn config(&self) -> PollerConfig {
        self.config
    }

    pub fn snapshot(&self) -> SelectionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.state.subscribe()
    }

    /// Makes `stop` the selection, fetches immediately and restarts both loops.
    ///
    /// Must be called from within a tokio runtime.
    pub fn select(&self, stop: Stop) {
        let ceiling = self.config.countdown_ceiling;
        let stop_id = stop.id.clone();

        let mut epoch = 0;
        self.state.send_modify(|state| {
            state.epoch += 1;
            state.stop = Some(stop);
            state.arrivals = ArrivalFeed::Pending;
            state.countdown = ceiling;
            state.overlay_open = true;
            epoch = state.epoch;
        });
        info!(stop = %stop_id, epoch, "polling arrivals");

        let timers = PollTimers {
            refresh: tokio::spawn(refresh_loop(
                self.source.clone(),
                self.state.clone(),
                stop_id,
                epoch,
                self.config.refresh_interval,
            )),
            countdown: tokio::spawn(countdown_loop(self.state.clone(), epoch, ceiling)),
        };
        self.replace_timers(Some(timers));
    }

    /// Fetches out of cadence and resets the countdown.
    ///
    /// The refresh loop keeps its own schedule. Returns `false` when nothing
    /// is selected.
    pub fn refresh(&self) -> bool {
        let ceiling = self.config.countdown_ceiling;
        let mut target = None;
        self.state.send_if_modified(|state| match &state.stop {
            Some(stop) => {
                target = Some((stop.id.clone(), state.epoch));
                state.countdown = ceiling;
                true
            }
            None => false,
        });

        let Some((stop_id, epoch)) = target else {
            return false;
        };
        debug!(stop = %stop_id, epoch, "manual refresh");
        tokio::spawn(fetch_arrivals(
            self.source.clone(),
            self.state.clone(),
            stop_id,
            epoch,
        ));
        true
    }

    /// Drops the selection and stops both loops.
    pub fn clear(&self) {
        let ceiling = self.config.countdown_ceiling;
        self.replace_timers(None);
        self.state.send_modify(|state| {
            state.epoch += 1;
            state.stop = None;
            state.arrivals = ArrivalFeed::Pending;
            state.countdown = ceiling;
            state.overlay_open = false;
        });
        debug!("selection cleared");
    }

    /// Shows or hides the arrivals overlay of the selected stop.
    pub fn toggle_overlay(&self) -> bool {
        let mut open = false;
        self.state.send_if_modified(|state| {
            if state.stop.is_none() {
                return false;
            }
            state.overlay_open = !state.overlay_open;
            open = state.overlay_open;
            true
        });
        open
    }

    fn replace_timers(&self, timers: Option<PollTimers>) {
        let previous = {
            let mut slot = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *slot, timers)
        };
        drop(previous);
    }
}

impl Drop for ArrivalPoller {
    fn drop(&mut self) {
        self.replace_timers(None);
    }
}

async fn refresh_loop(
    source: Arc<dyn TransitDataSource>,
    state: Arc<watch::Sender<SelectionState>>,
    stop_id: StopIdentifier,
    epoch: u64,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period.max(COUNTDOWN_TICK));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // first tick completes immediately
        interval.tick().await;
        tokio::spawn(fetch_arrivals(
            source.clone(),
            state.clone(),
            stop_id.clone(),
            epoch,
        ));
    }
}

async fn countdown_loop(state: Arc<watch::Sender<SelectionState>>, epoch: u64, ceiling: u32) {
    let mut interval = tokio::time::interval(COUNTDOWN_TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;

    loop {
        interval.tick().await;
        state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            state.countdown = match state.countdown {
                0 => ceiling,
                n => n - 1,
            };
            true
        });
    }
}

async fn fetch_arrivals(
    source: Arc<dyn TransitDataSource>,
    state: Arc<watch::Sender<SelectionState>>,
    stop_id: StopIdentifier,
    epoch: u64,
) {
    let feed = match source.arrivals(&stop_id).await {
        Ok(records) if records.is_empty() => ArrivalFeed::NoData,
        Ok(records) => ArrivalFeed::Loaded(ArrivalList::new(stop_id.clone(), reorder(records))),
        Err(TransitError::NoData) => ArrivalFeed::NoData,
        Err(error) => {
            warn!(stop = %stop_id, %error, "arrivals fetch failed");
            ArrivalFeed::Failed(error.to_string())
        }
    };

    let applied = state.send_if_modified(|state| {
        if state.epoch != epoch {
            return false;
        }
        state.arrivals = feed;
        true
    });

    if !applied {
        debug!(stop = %stop_id, epoch, "discarding stale arrivals");
    }
}
