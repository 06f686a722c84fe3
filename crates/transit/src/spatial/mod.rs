//! Coordinate normalization and distance utilities.

pub mod projection;
pub mod queries;

pub use projection::{normalize, LatLng, TransverseMercator, KOREA_EAST_BELT};
pub use queries::haversine_distance;
