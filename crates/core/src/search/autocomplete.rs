//! Debounced suggestions while the rider types.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use starbus_transit::Stop;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::search::service::{SearchOutcome, StopSearch};

pub const SUGGESTIONS_FAILED_MESSAGE: &str = "검색어 추천에 실패했습니다.";

/// Suggestions for the most recent query that settled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Suggestions {
    pub query: String,
    pub stops: Vec<Stop>,
    /// Set when the last search failed; `stops` then still holds the
    /// previous suggestions
    pub failed: Option<String>,
}

/// Debounces keystrokes into ranked autocomplete searches.
///
/// Every call to [`Autocomplete::input`] takes a new ticket. A search only
/// starts if its ticket is still the latest after the debounce, and its
/// result is only published if the ticket is still the latest when it lands.
pub struct Autocomplete {
    search: StopSearch,
    debounce: Duration,
    ticket: Arc<AtomicU64>,
    suggestions: Arc<watch::Sender<Suggestions>>,
}

impl Autocomplete {
    pub fn new(search: StopSearch, debounce: Duration) -> Self {
        let (suggestions, _) = watch::channel(Suggestions::default());
        Self {
            search,
            debounce,
            ticket: Arc::new(AtomicU64::new(0)),
            suggestions: Arc::new(suggestions),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Suggestions> {
        self.suggestions.subscribe()
    }

    pub fn current(&self) -> Suggestions {
        self.suggestions.borrow().clone()
    }

    /// Feeds the current text of the search box.
    ///
    /// A blank query clears the suggestions immediately without a search.
    pub fn input(&self, query: &str) -> JoinHandle<()> {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.to_string();

        if query.trim().is_empty() {
            self.suggestions.send_replace(Suggestions {
                query,
                ..Suggestions::default()
            });
            return tokio::spawn(async {});
        }

        let search = self.search.clone();
        let debounce = self.debounce;
        let latest = self.ticket.clone();
        let suggestions = self.suggestions.clone();

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if latest.load(Ordering::SeqCst) != ticket {
                trace!(%query, "superseded before search");
                return;
            }

            let outcome = search.autocomplete(&query).await;
            if latest.load(Ordering::SeqCst) != ticket {
                trace!(%query, "superseded during search");
                return;
            }

            match outcome {
                SearchOutcome::Found(stops) => {
                    suggestions.send_replace(Suggestions {
                        query,
                        stops,
                        failed: None,
                    });
                }
                SearchOutcome::NoResults => {
                    suggestions.send_replace(Suggestions {
                        query,
                        ..Suggestions::default()
                    });
                }
                SearchOutcome::Failed(error) => {
                    suggestions.send_modify(|current| {
                        current.query = query;
                        current.failed = Some(error.to_string());
                    });
                }
            }
        })
    }
}
