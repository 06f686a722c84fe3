//! Transverse Mercator grid to geographic coordinates.
//!
//! Stop positions come from the provider in the Korean "TM east belt" survey
//! grid (EPSG:5182). Map widgets want WGS84 latitude/longitude, so every stop
//! goes through [`normalize`] before it is placed on a map.
//!
//! The transform uses the Krüger series to fourth order in the third
//! flattening, which is accurate to well below a millimetre across the belt.
//! GRS80 and WGS84 differ by less than that, so no datum shift is applied.

use geo::Point;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees, as consumed by map widgets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Longitude/latitude ordered point (x = lng, y = lat)
    pub fn to_point(self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

impl From<Point> for LatLng {
    fn from(point: Point) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<LatLng> for Point {
    fn from(value: LatLng) -> Self {
        value.to_point()
    }
}

/// Parameters of a Transverse Mercator grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransverseMercator {
    /// Semi-major axis in metres
    pub semi_major_axis: f64,
    pub inverse_flattening: f64,
    /// Latitude of origin in degrees
    pub origin_lat: f64,
    /// Central meridian in degrees
    pub origin_lon: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// EPSG:5182, Korea 2000 / East Belt (TM 동부원점) on GRS80.
pub const KOREA_EAST_BELT: TransverseMercator = TransverseMercator {
    semi_major_axis: 6_378_137.0,
    inverse_flattening: 298.257_222_101,
    origin_lat: 38.0,
    origin_lon: 129.0,
    scale_factor: 1.0,
    false_easting: 200_000.0,
    false_northing: 600_000.0,
};

/// Converts an east-belt grid position to latitude/longitude.
///
/// Callers must check that the stop actually has survey coordinates first;
/// see [`crate::Stop::location`].
pub fn normalize(x: f64, y: f64) -> LatLng {
    KOREA_EAST_BELT.to_geographic(x, y).into()
}

struct KruegerSeries {
    /// Rectifying radius
    rectifying_radius: f64,
    eccentricity: f64,
    alpha: [f64; 4],
    beta: [f64; 4],
    delta: [f64; 4],
}

impl KruegerSeries {
    fn new(semi_major_axis: f64, flattening: f64) -> Self {
        let n = flattening / (2.0 - flattening);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        Self {
            rectifying_radius: semi_major_axis / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0),
            eccentricity: 2.0 * n.sqrt() / (1.0 + n),
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
                61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
                49561.0 * n4 / 161280.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
                n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
                17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
                4397.0 * n4 / 161280.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3 + 116.0 * n4 / 45.0,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0 - 227.0 * n4 / 45.0,
                56.0 * n3 / 15.0 - 136.0 * n4 / 35.0,
                4279.0 * n4 / 630.0,
            ],
        }
    }

    /// Conformal latitude parameter (tan of the conformal latitude)
    fn conformal_tan(&self, lat: f64) -> f64 {
        let e = self.eccentricity;
        let sin_lat = lat.sin();
        (sin_lat.atanh() - e * (e * sin_lat).atanh()).sinh()
    }

    /// Forward series, returning normalised (xi, eta)
    fn forward(&self, lat: f64, dlon: f64) -> (f64, f64) {
        let t = self.conformal_tan(lat);
        let xi_p = t.atan2(dlon.cos());
        let eta_p = (dlon.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += a * (k * xi_p).cos() * (k * eta_p).sinh();
        }
        (xi, eta)
    }

    /// Inverse series, returning (lat, dlon) in radians
    fn inverse(&self, xi: f64, eta: f64) -> (f64, f64) {
        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut lat = chi;
        for (j, d) in self.delta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            lat += d * (k * chi).sin();
        }
        let dlon = eta_p.sinh().atan2(xi_p.cos());
        (lat, dlon)
    }
}

impl TransverseMercator {
    fn series(&self) -> KruegerSeries {
        KruegerSeries::new(self.semi_major_axis, 1.0 / self.inverse_flattening)
    }

    /// Meridian distance from the equator to the latitude of origin, in
    /// normalised units.
    fn origin_xi(&self, series: &KruegerSeries) -> f64 {
        series.forward(self.origin_lat.to_radians(), 0.0).0
    }

    /// Grid (easting, northing) to a longitude/latitude point.
    pub fn to_geographic(&self, x: f64, y: f64) -> Point {
        let series = self.series();
        let scale = self.scale_factor * series.rectifying_radius;

        let xi = (y - self.false_northing) / scale + self.origin_xi(&series);
        let eta = (x - self.false_easting) / scale;
        let (lat, dlon) = series.inverse(xi, eta);

        Point::new(self.origin_lon + dlon.to_degrees(), lat.to_degrees())
    }

    /// Longitude/latitude point to grid (easting, northing).
    pub fn to_grid(&self, point: Point) -> (f64, f64) {
        let series = self.series();
        let scale = self.scale_factor * series.rectifying_radius;

        let (xi, eta) = series.forward(
            point.y().to_radians(),
            (point.x() - self.origin_lon).to_radians(),
        );

        (
            self.false_easting + scale * eta,
            self.false_northing + scale * (xi - self.origin_xi(&series)),
        )
    }
}
