//! Track records and the drop source that produces them.
//!
//! Dropping a file onto the terminal pastes its path; `parse_drop` turns the
//! pasted text back into paths and `expand_drop` turns paths into `Track`s.

mod display;
mod drop;
mod model;
mod scan;

pub use drop::parse_drop;
pub use model::Track;
pub use scan::{DropOutcome, expand_drop};
