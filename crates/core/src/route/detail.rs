//! Expanded view of one route: its itinerary with live vehicle markers.

use starbus_transit::{
    Result, RouteIdentifier, RouteStop, StopIdentifier, TransitDataSource, VehiclePosition,
};
use tracing::{debug, warn};

use crate::route::correlation::has_vehicle;

#[derive(Clone, Debug, PartialEq)]
pub struct RouteStopRow {
    pub stop: RouteStop,
    pub vehicle_present: bool,
    /// This row is the stop the rider has selected
    pub is_selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteDetail {
    pub route_id: RouteIdentifier,
    pub rows: Vec<RouteStopRow>,
}

impl RouteDetail {
    pub fn build(
        route_id: RouteIdentifier,
        itinerary: Vec<RouteStop>,
        positions: &[VehiclePosition],
        selected: Option<&StopIdentifier>,
    ) -> Self {
        let rows = itinerary
            .into_iter()
            .map(|stop| RouteStopRow {
                vehicle_present: has_vehicle(positions, &stop),
                is_selected: selected == Some(&stop.stop_id),
                stop,
            })
            .collect();

        Self { route_id, rows }
    }

    /// Fetches itinerary and positions concurrently.
    ///
    /// A failing position feed only means no vehicles are shown; a failing
    /// itinerary is returned as the error.
    pub async fn load(
        source: &dyn TransitDataSource,
        route_id: &RouteIdentifier,
        selected: Option<&StopIdentifier>,
    ) -> Result<Self> {
        let (itinerary, positions) = tokio::join!(
            source.route_stops(route_id),
            source.vehicle_positions(route_id)
        );

        let positions = positions.unwrap_or_else(|error| {
            warn!(route = %route_id, %error, "vehicle positions unavailable");
            Vec::new()
        });
        let itinerary = itinerary?;
        debug!(
            route = %route_id,
            stops = itinerary.len(),
            vehicles = positions.len(),
            "route detail"
        );

        Ok(Self::build(route_id.clone(), itinerary, &positions, selected))
    }

    pub fn selected_row(&self) -> Option<&RouteStopRow> {
        self.rows.iter().find(|row| row.is_selected)
    }

    pub fn vehicles_on_route(&self) -> usize {
        self.rows.iter().filter(|row| row.vehicle_present).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSource;
    use starbus_transit::{DirectionId, TransitError};

    fn itinerary() -> Vec<RouteStop> {
        [("A", 0), ("B", 0), ("C", 1), ("A", 1)]
            .iter()
            .enumerate()
            .map(|(i, (id, dir))| RouteStop {
                stop_id: StopIdentifier::new(id),
                name: format!("정류장 {id}"),
                direction: if *dir == 0 { DirectionId::Outbound } else { DirectionId::Inbound },
                sequence: Some(i as u32 + 1),
            })
            .collect()
    }

    fn position(id: &str, direction: DirectionId) -> VehiclePosition {
        VehiclePosition {
            route_id: Some(RouteIdentifier::new("706")),
            stop_id: StopIdentifier::new(id),
            direction,
            vehicle_no: Some("대구70자1234".into()),
        }
    }

    #[tokio::test]
    async fn test_load_marks_vehicles_and_selection() {
        let source = FakeSource::default();
        source.set_itinerary("706", itinerary());
        source.set_positions("706", vec![position("A", DirectionId::Inbound)]);

        let detail = RouteDetail::load(
            &source,
            &RouteIdentifier::new("706"),
            Some(&StopIdentifier::new("B")),
        )
        .await
        .unwrap();

        let present: Vec<bool> = detail.rows.iter().map(|r| r.vehicle_present).collect();
        assert_eq!(present, vec![false, false, false, true]);
        assert_eq!(detail.vehicles_on_route(), 1);
        assert_eq!(detail.selected_row().unwrap().stop.stop_id.as_str(), "B");
    }

    #[tokio::test]
    async fn test_position_failure_shows_no_vehicles() {
        let source = FakeSource::default();
        source.set_itinerary("706", itinerary());
        source.fail_positions();

        let detail = RouteDetail::load(&source, &RouteIdentifier::new("706"), None)
            .await
            .unwrap();
        assert_eq!(detail.rows.len(), 4);
        assert_eq!(detail.vehicles_on_route(), 0);
        assert!(detail.selected_row().is_none());
    }

    #[tokio::test]
    async fn test_missing_itinerary_is_an_error() {
        let source = FakeSource::default();
        let result = RouteDetail::load(&source, &RouteIdentifier::new("706"), None).await;
        assert!(matches!(result, Err(TransitError::NoData)));
    }
}
