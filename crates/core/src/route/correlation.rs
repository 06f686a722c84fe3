use starbus_transit::{RouteStop, VehiclePosition};

/// Whether a bus is registered at this stop, travelling the same direction.
pub fn has_vehicle(positions: &[VehiclePosition], route_stop: &RouteStop) -> bool {
    positions.iter().any(|position| {
        position.stop_id == route_stop.stop_id && position.direction == route_stop.direction
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use starbus_transit::{DirectionId, StopIdentifier};

    fn route_stop(id: &str, direction: DirectionId) -> RouteStop {
        RouteStop {
            stop_id: StopIdentifier::new(id),
            name: String::new(),
            direction,
            sequence: None,
        }
    }

    fn position(id: &str, direction: DirectionId) -> VehiclePosition {
        VehiclePosition {
            route_id: None,
            stop_id: StopIdentifier::new(id),
            direction,
            vehicle_no: None,
        }
    }

    #[test]
    fn test_requires_stop_and_direction() {
        let positions = vec![
            position("A", DirectionId::Outbound),
            position("B", DirectionId::Inbound),
        ];

        assert!(has_vehicle(&positions, &route_stop("A", DirectionId::Outbound)));
        assert!(!has_vehicle(&positions, &route_stop("A", DirectionId::Inbound)));
        assert!(has_vehicle(&positions, &route_stop("B", DirectionId::Inbound)));
        assert!(!has_vehicle(&positions, &route_stop("C", DirectionId::Outbound)));
        assert!(!has_vehicle(&[], &route_stop("A", DirectionId::Outbound)));
    }
}
