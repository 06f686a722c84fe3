pub mod correlation;
pub mod detail;

pub use correlation::has_vehicle;
pub use detail::{RouteDetail, RouteStopRow};
