//! Playback controller and progress indicator.
//!
//! `Player` owns the playlist store, the engine and the progress bar and is
//! driven by explicit calls from the runtime: user commands, engine events
//! and pointer input on the progress bar.

mod controller;
mod progress;

pub use controller::{PlaybackState, Player, Skip};
pub use progress::ProgressBar;

#[cfg(test)]
pub(crate) mod testing;
