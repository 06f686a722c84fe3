//! # starbus-transit
//!
//! Domain model for a client-side bus arrival aggregator.
//!
//! ## Features
//!
//! - **Wire models**: stops, arrivals, itineraries and vehicle positions
//!   deserialize straight from the provider's JSON
//! - **Projection**: local survey grid (TM east belt) to WGS84
//! - **Pluggable networking**: implement your own data source and storage
//!
//! ## Example
//!
//! ```
//! use starbus_transit::prelude::*;
//!
//! let stop: Stop = serde_json::from_str(
//!     r#"{"bsId":"7001001400","bsNm":"중앙로역","routeList":"410, 600","ngisXPos":"","ngisYPos":""}"#,
//! ).unwrap();
//!
//! assert_eq!(stop.id, StopIdentifier::new("7001001400"));
//! assert!(matches!(stop.location(), Err(TransitError::MissingGeoData(_))));
//!
//! let origin = normalize(200_000.0, 600_000.0);
//! assert!((origin.lat - 38.0).abs() < 1e-9);
//! assert!((origin.lng - 129.0).abs() < 1e-9);
//! ```

pub mod identifiers;
pub mod models;
pub mod network;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::types::*;
    pub use crate::network::traits::*;
    pub use crate::spatial::projection::{normalize, LatLng, TransverseMercator, KOREA_EAST_BELT};
}

pub use prelude::*;
