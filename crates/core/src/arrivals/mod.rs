pub mod display;
pub mod poller;
pub mod reorder;

pub use display::{ArrivalTone, NO_ARRIVALS_MESSAGE, UNKNOWN_STATE_LABEL, label, render};
pub use poller::{ArrivalFeed, ArrivalPoller, PollerConfig, SelectionState};
pub use reorder::reorder;
