//! Core data types and enums for transit data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::identifiers::*;
use crate::models::de;
use crate::spatial::projection::{normalize, LatLng};

// ============================================================================
// Enums
// ============================================================================

/// Direction of travel along a route (`moveDir`: 0 = outbound, 1 = inbound)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DirectionId {
    Outbound = 0,
    Inbound = 1,
}

impl DirectionId {
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "0" => Some(Self::Outbound),
            "1" => Some(Self::Inbound),
            _ => None,
        }
    }
}

impl Serialize for DirectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for DirectionId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        de::direction(deserializer)
    }
}

pub const IMMINENT_TOKEN: &str = "전";
pub const NEXT_IMMINENT_TOKEN: &str = "전전";
pub const NOT_YET_DISPATCHED_TOKEN: &str = "도착예정";
pub const UNKNOWN_TOKEN: &str = "";

/// Arrival-state token as sent by the provider.
///
/// The raw token round-trips unchanged through [`ArrivalState::as_token`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ArrivalState {
    /// "전": the bus is one stop away
    Imminent,
    /// "전전": the bus is two stops away
    NextImminent,
    /// "도착예정": the bus has not left the garage yet
    NotYetDispatched,
    /// Anything else, usually a minute count such as "5분"
    Eta(String),
    /// Blank, null or absent token
    #[default]
    Unknown,
}

impl ArrivalState {
    pub fn as_token(&self) -> &str {
        match self {
            Self::Imminent => IMMINENT_TOKEN,
            Self::NextImminent => NEXT_IMMINENT_TOKEN,
            Self::NotYetDispatched => NOT_YET_DISPATCHED_TOKEN,
            Self::Eta(eta) => eta,
            Self::Unknown => UNKNOWN_TOKEN,
        }
    }

    pub fn is_not_yet_dispatched(&self) -> bool {
        matches!(self, Self::NotYetDispatched)
    }
}

impl From<String> for ArrivalState {
    fn from(token: String) -> Self {
        match token.as_str() {
            IMMINENT_TOKEN => Self::Imminent,
            NEXT_IMMINENT_TOKEN => Self::NextImminent,
            NOT_YET_DISPATCHED_TOKEN => Self::NotYetDispatched,
            UNKNOWN_TOKEN => Self::Unknown,
            _ => Self::Eta(token),
        }
    }
}

impl From<&str> for ArrivalState {
    fn from(token: &str) -> Self {
        Self::from(token.to_string())
    }
}

impl Serialize for ArrivalState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A bus stop as returned by stop search and stored in favorites.
///
/// Field names on the wire (`bsId`, `bsNm`, ...) are kept on serialization
/// too, so a persisted favorite has the provider's own shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(rename = "bsId")]
    pub id: StopIdentifier,
    #[serde(rename = "bsNm", default, deserialize_with = "de::text")]
    pub name: String,
    /// Display string of the route numbers serving the stop
    #[serde(rename = "routeList", default, deserialize_with = "de::text")]
    pub route_list: String,
    #[serde(rename = "ngisXPos", default, deserialize_with = "de::coordinate")]
    pub grid_x: Option<f64>,
    #[serde(rename = "ngisYPos", default, deserialize_with = "de::coordinate")]
    pub grid_y: Option<f64>,
}

impl Stop {
    pub fn new(id: impl Into<StopIdentifier>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            route_list: String::new(),
            grid_x: None,
            grid_y: None,
        }
    }

    pub fn with_grid(mut self, x: f64, y: f64) -> Self {
        self.grid_x = Some(x);
        self.grid_y = Some(y);
        self
    }

    /// Geographic position of the stop.
    ///
    /// Both survey coordinates must be present; a stop without them is
    /// reported as [`TransitError::MissingGeoData`] instead of being placed
    /// at the grid origin.
    pub fn location(&self) -> Result<LatLng> {
        match (self.grid_x, self.grid_y) {
            (Some(x), Some(y)) => Ok(normalize(x, y)),
            _ => Err(TransitError::MissingGeoData(self.id.clone())),
        }
    }
}

/// One live arrival estimate at a stop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrivalRecord {
    #[serde(rename = "routeId")]
    pub route_id: RouteIdentifier,
    #[serde(rename = "routeNo", default, deserialize_with = "de::text")]
    pub route_no: String,
    #[serde(rename = "routeNote", default, deserialize_with = "de::optional_text")]
    pub route_note: Option<String>,
    #[serde(rename = "arrState", default, deserialize_with = "de::arrival_state")]
    pub state: ArrivalState,
    /// Vehicle display number
    #[serde(rename = "vhcNo2", default, deserialize_with = "de::text")]
    pub vehicle_no: String,
}

/// Arrivals for one stop at one point in time. Replaced wholesale on every poll.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrivalList {
    pub stop_id: StopIdentifier,
    pub records: Vec<ArrivalRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl ArrivalList {
    pub fn new(stop_id: StopIdentifier, records: Vec<ArrivalRecord>) -> Self {
        Self {
            stop_id,
            records,
            fetched_at: Utc::now(),
        }
    }
}

/// A stop as it appears along one route's itinerary; sequence is list order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    #[serde(rename = "bsId")]
    pub stop_id: StopIdentifier,
    #[serde(rename = "bsNm", default, deserialize_with = "de::text")]
    pub name: String,
    #[serde(rename = "moveDir")]
    pub direction: DirectionId,
    #[serde(rename = "seq", default, deserialize_with = "de::optional_sequence")]
    pub sequence: Option<u32>,
}

/// Live snapshot of a vehicle registered at a stop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehiclePosition {
    #[serde(rename = "routeId", default)]
    pub route_id: Option<RouteIdentifier>,
    #[serde(rename = "bsId")]
    pub stop_id: StopIdentifier,
    #[serde(rename = "moveDir")]
    pub direction: DirectionId,
    #[serde(rename = "vhcNo2", default, deserialize_with = "de::optional_text")]
    pub vehicle_no: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("No data returned")]
    NoData,

    #[error("Provider envelope rejected: {0}")]
    Envelope(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Stop {0} has no survey coordinates")]
    MissingGeoData(StopIdentifier),

    #[error("Persisted data is corrupted: {0}")]
    PersistenceCorruption(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_from_provider_json() {
        let stop: Stop = serde_json::from_str(
            r#"{"bsId":"7001001400","bsNm":"중앙로역","routeList":"410, 600","ngisXPos":"164021.5","ngisYPos":363612.25,"wincId":"ignored"}"#,
        )
        .unwrap();

        assert_eq!(stop.id.as_str(), "7001001400");
        assert_eq!(stop.name, "중앙로역");
        assert_eq!(stop.route_list, "410, 600");
        assert_eq!(stop.grid_x, Some(164021.5));
        assert_eq!(stop.grid_y, Some(363612.25));
        assert!(stop.location().is_ok());
    }

    #[test]
    fn test_stop_missing_coordinates() {
        for json in [
            r#"{"bsId":"1","bsNm":"a","ngisXPos":"","ngisYPos":"363612"}"#,
            r#"{"bsId":"1","bsNm":"a","ngisXPos":null,"ngisYPos":363612}"#,
            r#"{"bsId":"1","bsNm":"a","ngisYPos":363612}"#,
            r#"{"bsId":"1","bsNm":"a","ngisXPos":0,"ngisYPos":363612}"#,
        ] {
            let stop: Stop = serde_json::from_str(json).unwrap();
            assert_eq!(stop.grid_x, None, "{json}");
            match stop.location() {
                Err(TransitError::MissingGeoData(id)) => assert_eq!(id.as_str(), "1"),
                other => panic!("expected MissingGeoData, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_stop_persisted_shape_round_trips() {
        let stop = Stop::new("7001001400", "중앙로역").with_grid(164021.5, 363612.25);
        let json = serde_json::to_value(&stop).unwrap();

        assert_eq!(json["bsId"], "7001001400");
        assert_eq!(json["bsNm"], "중앙로역");

        let back: Stop = serde_json::from_value(json).unwrap();
        assert_eq!(back, stop);
    }

    #[test]
    fn test_arrival_state_tokens() {
        assert_eq!(ArrivalState::from("전"), ArrivalState::Imminent);
        assert_eq!(ArrivalState::from("전전"), ArrivalState::NextImminent);
        assert_eq!(ArrivalState::from("도착예정"), ArrivalState::NotYetDispatched);
        assert_eq!(ArrivalState::from("5분"), ArrivalState::Eta("5분".into()));
        assert_eq!(ArrivalState::from(""), ArrivalState::Unknown);

        for token in ["전", "전전", "도착예정", "12분", ""] {
            assert_eq!(ArrivalState::from(token).as_token(), token);
        }
        assert!(ArrivalState::NotYetDispatched.is_not_yet_dispatched());
        assert!(!ArrivalState::Imminent.is_not_yet_dispatched());
    }

    #[test]
    fn test_arrival_record_from_provider_json() {
        let record: ArrivalRecord = serde_json::from_str(
            r#"{"routeId":"3000706000","routeNo":706,"routeNote":"","arrState":"도착예정","vhcNo2":"1234"}"#,
        )
        .unwrap();

        assert_eq!(record.route_no, "706");
        assert_eq!(record.route_note, None);
        assert_eq!(record.state, ArrivalState::NotYetDispatched);
        assert_eq!(serde_json::to_value(&record).unwrap()["arrState"], "도착예정");
    }

    #[test]
    fn test_arrival_record_without_state() {
        let records: Vec<ArrivalRecord> = serde_json::from_str(
            r#"[
                {"routeId":"1","routeNo":"410","arrState":"3분","vhcNo2":"1"},
                {"routeId":"2","routeNo":"600","vhcNo2":"2"},
                {"routeId":"3","routeNo":"706","arrState":null,"vhcNo2":"3"}
            ]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].state, ArrivalState::Eta("3분".into()));
        assert_eq!(records[1].state, ArrivalState::Unknown);
        assert_eq!(records[2].state, ArrivalState::Unknown);
    }

    #[test]
    fn test_direction_flags() {
        let stop: RouteStop =
            serde_json::from_str(r#"{"bsId":"1","bsNm":"a","moveDir":"1","seq":"3"}"#).unwrap();
        assert_eq!(stop.direction, DirectionId::Inbound);
        assert_eq!(stop.sequence, Some(3));

        let position: VehiclePosition =
            serde_json::from_str(r#"{"bsId":"1","moveDir":0}"#).unwrap();
        assert_eq!(position.direction, DirectionId::Outbound);
        assert_eq!(position.route_id, None);

        assert!(serde_json::from_str::<VehiclePosition>(r#"{"bsId":"1","moveDir":"7"}"#).is_err());
    }
}
