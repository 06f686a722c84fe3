//! Rider's saved stops, persisted write-through.

use std::sync::Arc;

use itertools::Itertools;
use starbus_transit::{KeyValueStore, Result, Stop, StopIdentifier, TransitError};
use tracing::{debug, warn};

pub const FAVORITES_KEY: &str = "favorites";

/// How a favorites change affects the current selection.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionChange {
    Unchanged,
    /// The selected stop was removed; select this one instead
    Reassigned(Stop),
    /// The selected stop was removed and no favorites are left
    Cleared,
}

impl SelectionChange {
    pub fn was_reassigned(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toggled {
    pub favorites: Vec<Stop>,
    pub was_added: bool,
    pub selection: SelectionChange,
    /// Whether the new set reached the store
    pub persisted: bool,
}

pub struct FavoritesRegistry {
    store: Arc<dyn KeyValueStore>,
    favorites: Vec<Stop>,
}

impl FavoritesRegistry {
    /// An empty registry; call [`FavoritesRegistry::load`] to read the snapshot.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            favorites: Vec::new(),
        }
    }

    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let mut registry = Self::new(store);
        registry.load();
        registry
    }

    /// Reads the persisted snapshot. Missing, unreadable or malformed data
    /// all load as an empty set.
    pub fn load(&mut self) -> &[Stop] {
        self.favorites = match self.read() {
            Ok(stops) => stops,
            Err(error) => {
                warn!(%error, "favorites snapshot unusable, starting empty");
                Vec::new()
            }
        };
        debug!(count = self.favorites.len(), "favorites loaded");
        &self.favorites
    }

    fn read(&self) -> Result<Vec<Stop>> {
        let Some(raw) = self.store.load(FAVORITES_KEY)? else {
            return Ok(Vec::new());
        };
        let stops: Vec<Stop> = serde_json::from_str(&raw)
            .map_err(|e| TransitError::PersistenceCorruption(e.to_string()))?;

        Ok(stops.into_iter().unique_by(|stop| stop.id.clone()).collect())
    }

    pub fn favorites(&self) -> &[Stop] {
        &self.favorites
    }

    pub fn contains(&self, stop_id: &StopIdentifier) -> bool {
        self.favorites.iter().any(|stop| &stop.id == stop_id)
    }

    pub fn first(&self) -> Option<&Stop> {
        self.favorites.first()
    }

    /// Adds `stop` if absent, removes it if present, and persists the result.
    ///
    /// `selected` is the currently selected stop. Removing it hands the
    /// selection to the first remaining favorite, or clears it. If the new
    /// set cannot be persisted the previous set is kept and the selection
    /// is left alone.
    pub fn toggle(&mut self, stop: Stop, selected: Option<&StopIdentifier>) -> Toggled {
        let previous = self.favorites.clone();
        let position = self.favorites.iter().position(|s| s.id == stop.id);

        let (was_added, selection) = match position {
            Some(index) => {
                let removed = self.favorites.remove(index);
                let selection = if selected == Some(&removed.id) {
                    match self.favorites.first() {
                        Some(next) => SelectionChange::Reassigned(next.clone()),
                        None => SelectionChange::Cleared,
                    }
                } else {
                    SelectionChange::Unchanged
                };
                (false, selection)
            }
            None => {
                self.favorites.push(stop);
                (true, SelectionChange::Unchanged)
            }
        };

        if let Err(error) = self.persist() {
            warn!(%error, "failed to persist favorites, keeping previous set");
            self.favorites = previous;
            return Toggled {
                favorites: self.favorites.clone(),
                was_added,
                selection: SelectionChange::Unchanged,
                persisted: false,
            };
        }

        Toggled {
            favorites: self.favorites.clone(),
            was_added,
            selection,
            persisted: true,
        }
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.favorites)
            .map_err(|e| TransitError::SerializationError(e.to_string()))?;
        self.store.save(FAVORITES_KEY, &raw)
    }
}
