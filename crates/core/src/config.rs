//! Runtime configuration.
//!
//! Values come from an optional JSON file and are then overridden by the
//! caller (the CLI maps flags and environment variables onto the struct).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use starbus_transit::{Result, TransitError};

use crate::arrivals::poller::PollerConfig;

pub const DEFAULT_SEARCH_URL: &str = "https://businfo.daegu.go.kr:8095/dbms_web_api/bs/search";
pub const DEFAULT_ARRIVALS_URL: &str =
    "https://businfo.daegu.go.kr:8095/dbms_web_api/realtime/arr";
pub const DEFAULT_ROUTE_STOPS_URL: &str = "https://apis.data.go.kr/6270000/dbmsapi01/getBs";
pub const DEFAULT_ROUTE_POSITIONS_URL: &str = "https://apis.data.go.kr/6270000/dbmsapi01/getPos";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarbusConfig {
    pub search_url: String,
    pub arrivals_url: String,
    pub route_stops_url: String,
    pub route_positions_url: String,
    /// Decoded data.go.kr service key, required by the two route endpoints
    pub service_key: Option<String>,
    pub refresh_interval_secs: u64,
    pub countdown_ceiling: u32,
    pub autocomplete_debounce_ms: u64,
    pub request_timeout_secs: u64,
    /// Where the favorites snapshot lives
    pub favorites_dir: Option<PathBuf>,
}

impl Default for StarbusConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            arrivals_url: DEFAULT_ARRIVALS_URL.to_string(),
            route_stops_url: DEFAULT_ROUTE_STOPS_URL.to_string(),
            route_positions_url: DEFAULT_ROUTE_POSITIONS_URL.to_string(),
            service_key: None,
            refresh_interval_secs: 15,
            countdown_ceiling: 15,
            autocomplete_debounce_ms: 300,
            request_timeout_secs: 10,
            favorites_dir: None,
        }
    }
}

impl StarbusConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| TransitError::Storage(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| TransitError::InvalidData(format!("{}: {e}", path.display())))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn autocomplete_debounce(&self) -> Duration {
        Duration::from_millis(self.autocomplete_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn poller(&self) -> PollerConfig {
        PollerConfig {
            refresh_interval: self.refresh_interval(),
            countdown_ceiling: self.countdown_ceiling,
        }
    }
}
