//! Pluggable networking and storage traits.
//!
//! External crates implement these to provide data fetching capabilities.

use std::future::Future;
use std::pin::Pin;

use crate::identifiers::{RouteIdentifier, StopIdentifier};
use crate::models::types::{ArrivalRecord, Result, RouteStop, Stop, VehiclePosition};

/// Read-only access to the remote transit data provider
pub trait TransitDataSource: Send + Sync {
    /// Stops whose name matches a free-text query, exactly as the provider
    /// returned them. An empty result is `Ok(vec![])`.
    fn search_stops<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Stop>>> + Send + 'a>>;

    /// Live arrivals at a stop, in provider order.
    ///
    /// An absent or empty list is reported as `TransitError::NoData`, distinct
    /// from a transport failure.
    fn arrivals<'a>(
        &'a self,
        stop_id: &'a StopIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ArrivalRecord>>> + Send + 'a>>;

    /// Ordered itinerary of a route
    fn route_stops<'a>(
        &'a self,
        route_id: &'a RouteIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RouteStop>>> + Send + 'a>>;

    /// Vehicles currently registered along a route
    fn vehicle_positions<'a>(
        &'a self,
        route_id: &'a RouteIdentifier,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<VehiclePosition>>> + Send + 'a>>;
}

/// Durable key-value storage for small JSON snapshots.
///
/// Writes replace the whole value; implementations should make them atomic.
pub trait KeyValueStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&self, key: &str, value: &str) -> Result<()>;
}
