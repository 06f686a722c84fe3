pub mod autocomplete;
pub mod rank;
pub mod service;

pub use autocomplete::{Autocomplete, SUGGESTIONS_FAILED_MESSAGE, Suggestions};
pub use rank::rank;
pub use service::{SearchOutcome, StopSearch};
