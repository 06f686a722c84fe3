pub mod registry;
pub mod store;

pub use registry::{FAVORITES_KEY, FavoritesRegistry, SelectionChange, Toggled};
pub use store::{FileStore, MemoryStore};
