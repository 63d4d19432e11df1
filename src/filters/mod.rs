//! Content filters applied during acquisition: short-form rejection for
//! videos and the English heuristic for comments.

pub mod duration;
pub mod language;

pub use duration::{is_long_form, parse_duration, MIN_DURATION_SECS};
pub use language::is_target_language;
