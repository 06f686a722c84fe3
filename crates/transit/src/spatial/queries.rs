//! Spatial query utilities for distance calculations.
//!
//! Uses Haversine formula for accurate distances on Earth's surface.

use geo::{HaversineDistance, Point};

use crate::spatial::projection::LatLng;

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

impl LatLng {
    /// Great-circle distance to another position in meters
    pub fn distance_to(self, other: LatLng) -> f64 {
        haversine_distance(self.to_point(), other.to_point())
    }
}
