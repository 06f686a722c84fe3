//! Relevance ordering for stop-name suggestions.

use itertools::Itertools;
use starbus_transit::Stop;

/// Sort key of a candidate; smaller is more relevant.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Relevance {
    partial: bool,
    not_prefix: bool,
    /// Character offset of the first match
    position: usize,
    name: String,
}

impl Relevance {
    fn of(needle: &str, stop: &Stop) -> Option<Self> {
        let name = stop.name.to_lowercase();
        let byte_offset = name.find(needle)?;

        Some(Self {
            partial: name != needle,
            not_prefix: byte_offset != 0,
            position: name[..byte_offset].chars().count(),
            name,
        })
    }
}

/// Deduplicates candidates by stop id (first occurrence wins), keeps those
/// whose name contains the query case-insensitively, and orders them:
/// exact match, then prefix match, then earlier match position, then name.
///
/// Equal keys keep their provider order. A blank query ranks nothing.
pub fn rank<I>(query: &str, candidates: I) -> Vec<Stop>
where
    I: IntoIterator<Item = Stop>,
{
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    candidates
        .into_iter()
        .unique_by(|stop| stop.id.clone())
        .filter_map(|stop| Relevance::of(&needle, &stop).map(|relevance| (relevance, stop)))
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, stop)| stop)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(stops: &[Stop]) -> Vec<&str> {
        stops.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_exact_then_prefix_then_contains() {
        let candidates = vec![
            Stop::new("3", "동중앙"),
            Stop::new("2", "중앙로"),
            Stop::new("1", "중앙"),
        ];

        assert_eq!(names(&rank("중앙", candidates)), vec!["중앙", "중앙로", "동중앙"]);
    }

    #[test]
    fn test_blank_query_is_empty() {
        let candidates = vec![Stop::new("1", "중앙"), Stop::new("2", "반월당")];
        assert!(rank("", candidates.clone()).is_empty());
        assert!(rank("   ", candidates).is_empty());
        assert!(rank("", Vec::new()).is_empty());
    }

    #[test]
    fn test_case_insensitive_filter() {
        let candidates = vec![
            Stop::new("1", "EXCO"),
            Stop::new("2", "Exco 앞"),
            Stop::new("3", "반월당"),
        ];

        assert_eq!(names(&rank("exco", candidates)), vec!["EXCO", "Exco 앞"]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let candidates = vec![
            Stop::new("1", "중앙로역"),
            Stop::new("1", "중앙로역(건너)"),
            Stop::new("2", "중앙로역"),
        ];

        let ranked = rank("중앙로", candidates);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id.as_str(), "1");
        assert_eq!(ranked[0].name, "중앙로역");
        assert_eq!(ranked[1].id.as_str(), "2");
    }

    #[test]
    fn test_position_then_name() {
        let candidates = vec![
            Stop::new("1", "대구중앙"),
            Stop::new("2", "동중앙"),
            Stop::new("3", "남중앙"),
        ];

        assert_eq!(
            names(&rank("중앙", candidates)),
            vec!["남중앙", "동중앙", "대구중앙"]
        );
    }

    #[test]
    fn test_exact_match_wins_over_prefix_regardless_of_input_order() {
        let candidates = vec![Stop::new("1", "반월당역"), Stop::new("2", "반월당")];
        let ranked = rank("반월당", candidates);
        assert_eq!(ranked[0].id.as_str(), "2");
    }

    #[test]
    fn test_identical_names_keep_provider_order() {
        let candidates = vec![
            Stop::new("b", "중앙로"),
            Stop::new("a", "중앙로"),
        ];

        let ranked = rank("중앙", candidates);
        assert_eq!(ranked[0].id.as_str(), "b");
        assert_eq!(ranked[1].id.as_str(), "a");
    }
}
