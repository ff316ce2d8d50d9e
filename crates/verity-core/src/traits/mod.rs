pub mod clock;
pub mod suggestion_source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use suggestion_source::SuggestionSource;
