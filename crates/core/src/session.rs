//! One rider's view of the engine: search, favorites, polling and map center.

use std::sync::Arc;

use starbus_transit::{KeyValueStore, LatLng, Result, RouteIdentifier, Stop, TransitDataSource};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::arrivals::poller::{ArrivalPoller, SelectionState};
use crate::config::StarbusConfig;
use crate::favorites::registry::{FavoritesRegistry, SelectionChange, Toggled};
use crate::route::detail::RouteDetail;
use crate::search::autocomplete::{Autocomplete, Suggestions};
use crate::search::service::{SearchOutcome, StopSearch};

/// Map center before anything is selected (Daegu city hall)
pub const DEFAULT_MAP_CENTER: LatLng = LatLng::new(35.8693, 128.6062);

/// Where the map went after a selection
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    Centered(LatLng),
    /// The stop has no survey coordinates; the map stays put
    MissingGeoData,
}

pub struct RiderSession {
    source: Arc<dyn TransitDataSource>,
    search: StopSearch,
    autocomplete: Autocomplete,
    favorites: FavoritesRegistry,
    poller: ArrivalPoller,
    map_center: LatLng,
    results: Vec<Stop>,
}

impl RiderSession {
    pub fn new(
        source: Arc<dyn TransitDataSource>,
        store: Arc<dyn KeyValueStore>,
        config: &StarbusConfig,
    ) -> Self {
        let search = StopSearch::new(source.clone());
        Self {
            autocomplete: Autocomplete::new(search.clone(), config.autocomplete_debounce()),
            poller: ArrivalPoller::new(source.clone(), config.poller()),
            favorites: FavoritesRegistry::new(store),
            source,
            search,
            map_center: DEFAULT_MAP_CENTER,
            results: Vec::new(),
        }
    }

    /// Loads favorites and selects the first one, if any.
    pub fn start(&mut self) -> Option<Placement> {
        let first = self.favorites.load().first().cloned()?;
        Some(self.select(first))
    }

    /// List-view search. Results replace the previous list and reset the
    /// selection; an empty or failed search leaves everything as it was.
    pub async fn search(&mut self, query: &str) -> SearchOutcome {
        let outcome = self.search.list(query).await;
        if let SearchOutcome::Found(stops) = &outcome {
            self.results = stops.clone();
            self.poller.clear();
        }
        outcome
    }

    /// Feeds the search box text to the debounced autocomplete.
    pub fn suggest(&self, query: &str) -> JoinHandle<()> {
        self.autocomplete.input(query)
    }

    pub fn suggestions(&self) -> Suggestions {
        self.autocomplete.current()
    }

    pub fn subscribe_suggestions(&self) -> watch::Receiver<Suggestions> {
        self.autocomplete.subscribe()
    }

    /// Selects `stop`, centers the map on it and starts polling its arrivals.
    pub fn select(&mut self, stop: Stop) -> Placement {
        let placement = match stop.location() {
            Ok(location) => {
                self.map_center = location;
                Placement::Centered(location)
            }
            Err(error) => {
                info!(%error, "not moving map");
                Placement::MissingGeoData
            }
        };
        self.poller.select(stop);
        placement
    }

    /// Selects the `index`th stop of the last list search.
    pub fn select_result(&mut self, index: usize) -> Option<Placement> {
        let stop = self.results.get(index).cloned()?;
        Some(self.select(stop))
    }

    pub fn refresh(&self) -> bool {
        self.poller.refresh()
    }

    pub fn toggle_overlay(&self) -> bool {
        self.poller.toggle_overlay()
    }

    /// Toggles `stop` in favorites and applies the resulting selection change.
    pub fn toggle_favorite(&mut self, stop: Stop) -> Toggled {
        let selected = self.poller.snapshot().selected_id().cloned();
        let toggled = self.favorites.toggle(stop, selected.as_ref());

        match &toggled.selection {
            SelectionChange::Reassigned(next) => {
                self.select(next.clone());
            }
            SelectionChange::Cleared => self.poller.clear(),
            SelectionChange::Unchanged => {}
        }
        toggled
    }

    /// Itinerary of a route, with the selected stop and live vehicles marked.
    pub async fn route_detail(&self, route_id: &RouteIdentifier) -> Result<RouteDetail> {
        let selected = self.poller.snapshot().selected_id().cloned();
        RouteDetail::load(self.source.as_ref(), route_id, selected.as_ref()).await
    }

    /// Position of the selected stop, if it has one.
    pub fn selected_location(&self) -> Option<Result<LatLng>> {
        self.poller.snapshot().stop.map(|stop| stop.location())
    }

    pub fn selection(&self) -> SelectionState {
        self.poller.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.poller.subscribe()
    }

    pub fn map_center(&self) -> LatLng {
        self.map_center
    }

    pub fn favorites(&self) -> &[Stop] {
        self.favorites.favorites()
    }

    pub fn results(&self) -> &[Stop] {
        &self.results
    }
}

impl std::fmt::Debug for RiderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiderSession")
            .field("map_center", &self.map_center)
            .field("results", &self.results.len())
            .field("favorites", &self.favorites.favorites().len())
            .finish_non_exhaustive()
    }
}
