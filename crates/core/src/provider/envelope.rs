//! Response envelopes of the transit data provider.
//!
//! Every endpoint wraps its payload as `{"header": {...}, "body": ...}`.
//! Decoding goes through these types so the rest of the crate only ever sees
//! a typed body or a `TransitError`.

use serde::Deserialize;
use starbus_transit::{ArrivalRecord, Result, RouteStop, TransitError, VehiclePosition};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Header {
    #[serde(default)]
    success: Option<bool>,
    #[serde(rename = "resultMsg", default)]
    result_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<B> {
    #[serde(default)]
    header: Option<Header>,
    body: Option<B>,
}

impl<B> Envelope<B> {
    /// The body, provided the header does not report failure.
    pub(crate) fn into_body(self) -> Result<B> {
        let header = self.header.unwrap_or_default();
        if header.success == Some(false) {
            return Err(TransitError::Envelope(
                header
                    .result_msg
                    .unwrap_or_else(|| "success flag is false".to_string()),
            ));
        }

        self.body
            .ok_or_else(|| TransitError::Envelope("response has no body".to_string()))
    }
}

pub(crate) fn decode<B>(bytes: &[u8]) -> Result<B>
where
    B: for<'de> Deserialize<'de>,
{
    serde_json::from_slice::<Envelope<B>>(bytes)
        .map_err(|e| TransitError::Envelope(format!("malformed body: {e}")))?
        .into_body()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArrivalBody {
    #[serde(default)]
    list: Option<Vec<ArrivalRecord>>,
}

impl ArrivalBody {
    /// Arrivals in provider order; an absent or empty list is `NoData`.
    pub(crate) fn into_records(self) -> Result<Vec<ArrivalRecord>> {
        match self.list {
            Some(list) if !list.is_empty() => Ok(list),
            _ => Err(TransitError::NoData),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemsBody<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

impl ItemsBody<RouteStop> {
    pub(crate) fn into_itinerary(self) -> Result<Vec<RouteStop>> {
        if self.items.is_empty() {
            Err(TransitError::NoData)
        } else {
            Ok(self.items)
        }
    }
}

impl ItemsBody<VehiclePosition> {
    /// An empty position list just means no bus is on the road right now.
    pub(crate) fn into_positions(self) -> Vec<VehiclePosition> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starbus_transit::{ArrivalState, DirectionId, Stop};

    #[test]
    fn test_search_envelope() {
        let stops: Vec<Stop> = decode(
            r#"{"header":{"success":true,"resultCode":"0000"},"body":[
                {"bsId":"7001001400","bsNm":"중앙로역","routeList":"410","ngisXPos":"164021","ngisYPos":"363612"},
                {"bsId":"7001001500","bsNm":"중앙네거리","routeList":"","ngisXPos":"","ngisYPos":""}
            ]}"#.as_bytes(),
        )
        .unwrap();

        assert_eq!(stops.len(), 2);
        assert!(stops[1].location().is_err());
    }

    #[test]
    fn test_failed_header_is_envelope_error() {
        let err = decode::<Vec<Stop>>(
            r#"{"header":{"success":false,"resultMsg":"invalid request"},"body":null}"#.as_bytes(),
        )
        .unwrap_err();

        match err {
            TransitError::Envelope(message) => assert_eq!(message, "invalid request"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body_is_envelope_error() {
        assert!(matches!(
            decode::<ArrivalBody>(r#"{"header":{"success":true},"body":null}"#.as_bytes()),
            Err(TransitError::Envelope(_))
        ));
        assert!(matches!(
            decode::<Vec<Stop>>("<html>gateway timeout</html>".as_bytes()),
            Err(TransitError::Envelope(_))
        ));
        assert!(matches!(
            decode::<Vec<Stop>>(r#"{"header":{"success":true}}"#.as_bytes()),
            Err(TransitError::Envelope(_))
        ));
    }

    #[test]
    fn test_arrival_body() {
        let records = decode::<ArrivalBody>(
            r#"{"header":{"success":true},"body":{"bsId":"7001001400","list":[
                {"routeId":"3000410000","routeNo":"410","routeNote":"","arrState":"전","vhcNo2":"3401"}
            ]}}"#.as_bytes(),
        )
        .and_then(ArrivalBody::into_records)
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state, ArrivalState::Imminent);
    }

    #[test]
    fn test_empty_arrival_list_is_no_data() {
        for json in [
            r#"{"header":{"success":true},"body":{"list":[]}}"#.as_bytes(),
            r#"{"header":{"success":true},"body":{}}"#.as_bytes(),
        ] {
            let result = decode::<ArrivalBody>(json).and_then(ArrivalBody::into_records);
            assert!(matches!(result, Err(TransitError::NoData)));
        }
    }

    #[test]
    fn test_route_bodies() {
        let itinerary = decode::<ItemsBody<RouteStop>>(
            r#"{"header":{"resultCode":"0000","resultMsg":"OK","success":true},"body":{"items":[
                {"bsId":"7001001400","bsNm":"중앙로역","moveDir":"0","seq":1},
                {"bsId":"7001001500","bsNm":"반월당","moveDir":"1","seq":2}
            ],"totalCount":2}}"#.as_bytes(),
        )
        .and_then(ItemsBody::into_itinerary)
        .unwrap();
        assert_eq!(itinerary[1].direction, DirectionId::Inbound);

        let positions = decode::<ItemsBody<VehiclePosition>>(
            r#"{"header":{"success":true},"body":{"totalCount":0}}"#.as_bytes(),
        )
        .unwrap()
        .into_positions();
        assert!(positions.is_empty());
    }
}
