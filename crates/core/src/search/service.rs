use std::sync::Arc;

use starbus_transit::{Stop, TransitDataSource, TransitError};
use tracing::{debug, warn};

use crate::search::rank::rank;

/// Result of a stop search as shown to the rider.
#[derive(Debug)]
pub enum SearchOutcome {
    Found(Vec<Stop>),
    /// Nothing matched, or the provider rejected the request
    NoResults,
    /// Network or HTTP failure; worth a transient message
    Failed(TransitError),
}

impl SearchOutcome {
    pub fn stops(&self) -> &[Stop] {
        match self {
            Self::Found(stops) => stops,
            _ => &[],
        }
    }

    pub fn into_stops(self) -> Vec<Stop> {
        match self {
            Self::Found(stops) => stops,
            _ => Vec::new(),
        }
    }

    fn from_candidates(stops: Vec<Stop>) -> Self {
        if stops.is_empty() {
            Self::NoResults
        } else {
            Self::Found(stops)
        }
    }

    fn from_error(query: &str, error: TransitError) -> Self {
        match error {
            TransitError::Envelope(reason) => {
                warn!(query, %reason, "stop search rejected by provider");
                Self::NoResults
            }
            error => {
                warn!(query, %error, "stop search failed");
                Self::Failed(error)
            }
        }
    }
}

/// Stop search over a transit data source.
///
/// There are two paths and they deliberately differ: [`StopSearch::list`]
/// shows the provider's answer verbatim, while [`StopSearch::autocomplete`]
/// filters and ranks it client-side.
#[derive(Clone)]
pub struct StopSearch {
    source: Arc<dyn TransitDataSource>,
}

impl StopSearch {
    pub fn new(source: Arc<dyn TransitDataSource>) -> Self {
        Self { source }
    }

    /// The list-view search: provider results, unfiltered and in provider order.
    pub async fn list(&self, query: &str) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::NoResults;
        }

        match self.source.search_stops(query).await {
            Ok(stops) => {
                debug!(query, count = stops.len(), "stop search");
                SearchOutcome::from_candidates(stops)
            }
            Err(error) => SearchOutcome::from_error(query, error),
        }
    }

    /// The suggestion search: deduplicated, filtered and ranked by relevance.
    pub async fn autocomplete(&self, query: &str) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::NoResults;
        }

        match self.source.search_stops(query).await {
            Ok(stops) => SearchOutcome::from_candidates(rank(query, stops)),
            Err(error) => SearchOutcome::from_error(query, error),
        }
    }
}
