//! Transit data models and types.

pub(crate) mod de;
pub mod types;

// Re-exports for convenience
pub use types::{
    ArrivalList, ArrivalRecord, ArrivalState, DirectionId, Result, RouteStop, Stop,
    TransitError, VehiclePosition,
};
