//! In-memory transit source for tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use starbus_transit::{
    ArrivalRecord, ArrivalState, Result, RouteIdentifier, RouteStop, Stop, StopIdentifier,
    TransitDataSource, TransitError, VehiclePosition,
};

type ErrorFactory = Box<dyn Fn() -> TransitError + Send + Sync>;

#[derive(Clone, Debug)]
pub enum FakeReply {
    Records(Vec<ArrivalRecord>),
    NoData,
    Transport,
}

#[derive(Default)]
pub struct FakeSource {
    stops: Vec<Stop>,
    search_error: Mutex<Option<ErrorFactory>>,
    arrivals: Mutex<HashMap<StopIdentifier, FakeReply>>,
    arrival_delays: Mutex<HashMap<StopIdentifier, Duration>>,
    itineraries: Mutex<HashMap<RouteIdentifier, Vec<RouteStop>>>,
    positions: Mutex<HashMap<RouteIdentifier, Vec<VehiclePosition>>>,
    positions_fail: Mutex<bool>,
    delay: Mutex<Duration>,
    requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_stops(stops: Vec<Stop>) -> Self {
        Self {
            stops,
            ..Self::default()
        }
    }

    pub fn fail_search_with(&self, error: impl Fn() -> TransitError + Send + Sync + 'static) {
        *self.search_error.lock().unwrap() = Some(Box::new(error));
    }

    /// Delay applied to every call
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set_arrivals(&self, stop_id: &str, reply: FakeReply) {
        self.arrivals
            .lock()
            .unwrap()
            .insert(StopIdentifier::new(stop_id), reply);
    }

    pub fn set_arrival_delay(&self, stop_id: &str, delay: Duration) {
        self.arrival_delays
            .lock()
            .unwrap()
            .insert(StopIdentifier::new(stop_id), delay);
    }

    pub fn set_itinerary(&self, route_id: &str, stops: Vec<RouteStop>) {
        self.itineraries
            .lock()
            .unwrap()
            .insert(RouteIdentifier::new(route_id), stops);
    }

    pub fn set_positions(&self, route_id: &str, positions: Vec<VehiclePosition>) {
        self.positions
            .lock()
            .unwrap()
            .insert(RouteIdentifier::new(route_id), positions);
    }

    pub fn fail_positions(&self) {
        *self.positions_fail.lock().unwrap() = true;
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    fn log(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    async fn pause(&self, extra: Option<Duration>) {
        let delay = extra.unwrap_or(*self.delay.lock().unwrap());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

pub fn record(route_id: &str, route_no: &str, state: &str) -> ArrivalRecord {
    ArrivalRecord {
        route_id: RouteIdentifier::new(route_id),
        route_no: route_no.to_string(),
        route_note: None,
        state: ArrivalState::from(state),
        vehicle_no: String::new(),
    }
}

impl TransitDataSource for FakeSource {
    fn search_stops<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Stop>>> + Send + 'a>> {
        Box::pin(async move {
            self.log(format!("search:{query}"));
            self.pause(None).await;
            if let Some(error) = self.search_error.lock().unwrap().as_ref() {
                return Err(error());
            }
            Ok(self.stops.clone())
        })
    }

    fn arrivals<'a>(
        &'a self,
        stop_id: &'a StopIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ArrivalRecord>>> + Send + 'a>> {
        Box::pin(async move {
            self.log(format!("arrivals:{stop_id}"));
            let delay = self.arrival_delays.lock().unwrap().get(stop_id).copied();
            self.pause(delay).await;

            let reply = self.arrivals.lock().unwrap().get(stop_id).cloned();
            match reply {
                Some(FakeReply::Records(records)) => Ok(records),
                Some(FakeReply::Transport) => Err(TransitError::Transport("connection reset".into())),
                Some(FakeReply::NoData) | None => Err(TransitError::NoData),
            }
        })
    }

    fn route_stops<'a>(
        &'a self,
        route_id: &'a RouteIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RouteStop>>> + Send + 'a>> {
        Box::pin(async move {
            self.log(format!("route:{route_id}"));
            self.pause(None).await;
            self.itineraries
                .lock()
                .unwrap()
                .get(route_id)
                .cloned()
                .ok_or(TransitError::NoData)
        })
    }

    fn vehicle_positions<'a>(
        &'a self,
        route_id: &'a RouteIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<VehiclePosition>>> + Send + 'a>> {
        Box::pin(async move {
            self.log(format!("positions:{route_id}"));
            self.pause(None).await;
            if *self.positions_fail.lock().unwrap() {
                return Err(TransitError::Transport("timeout".into()));
            }
            Ok(self
                .positions
                .lock()
                .unwrap()
                .get(route_id)
                .cloned()
                .unwrap_or_default())
        })
    }
}
