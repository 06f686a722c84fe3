pub mod arrivals;
pub mod config;
pub mod favorites;
pub mod provider;
pub mod route;
pub mod search;
pub mod session;

#[cfg(test)]
mod testing;

// Re-export transit from the transit crate
pub use starbus_transit as transit;

pub use config::StarbusConfig;
pub use session::{DEFAULT_MAP_CENTER, Placement, RiderSession};
