//! Transit data providers.

pub mod daegu;
mod envelope;

pub use daegu::DaeguBusClient;
