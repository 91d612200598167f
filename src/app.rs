//! Application module: the model the TUI renders and the input handlers
//! that drive it.
//!
//! `App` owns the player (playlist, controller, progress) and the
//! visualizer, and is the only writer of any of them.

mod input;
mod model;

pub use model::*;

#[cfg(test)]
mod tests;
