use starbus_transit::ArrivalRecord;

/// Moves buses still waiting at the garage behind everything already on the road.
///
/// Both groups keep their original relative order, so applying this twice
/// changes nothing.
pub fn reorder(records: Vec<ArrivalRecord>) -> Vec<ArrivalRecord> {
    let (waiting, mut moving): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|record| record.state.is_not_yet_dispatched());

    moving.extend(waiting);
    moving
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    fn tokens(records: &[ArrivalRecord]) -> Vec<&str> {
        records.iter().map(|r| r.state.as_token()).collect()
    }

    #[test]
    fn test_garage_entries_move_to_the_end() {
        let records = vec![
            record("1", "101", "전전"),
            record("2", "102", "도착예정"),
            record("3", "103", "5분"),
            record("4", "104", "도착예정"),
        ];

        let reordered = reorder(records);
        assert_eq!(tokens(&reordered), vec!["전전", "5분", "도착예정", "도착예정"]);

        let routes: Vec<&str> = reordered.iter().map(|r| r.route_no.as_str()).collect();
        assert_eq!(routes, vec!["101", "103", "102", "104"]);
    }

    #[test]
    fn test_reorder_is_idempotent() {
        let records = vec![
            record("1", "101", "도착예정"),
            record("2", "102", "전"),
            record("3", "103", "도착예정"),
            record("4", "104", "12분"),
        ];

        let once = reorder(records);
        let twice = reorder(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_garage_entries_keeps_order() {
        let records = vec![
            record("1", "101", "7분"),
            record("2", "102", "전"),
            record("3", "103", "전전"),
        ];
        assert_eq!(reorder(records.clone()), records);
        assert!(reorder(Vec::new()).is_empty());
    }

    #[test]
    fn test_nothing_dropped_or_duplicated() {
        let records: Vec<_> = ["도착예정", "3분", "도착예정", "전", "도착예정"]
            .iter()
            .enumerate()
            .map(|(i, state)| record(&i.to_string(), &format!("{}", 100 + i), state))
            .collect();

        let reordered = reorder(records.clone());
        assert_eq!(reordered.len(), records.len());
        for record in &records {
            assert_eq!(reordered.iter().filter(|r| *r == record).count(), 1);
        }
    }
}
