//! The seam between the playback controller and whatever decodes and
//! outputs audio.

use std::time::Duration;

use crate::error::Result;
use crate::library::Track;

/// Notifications raised by an engine, drained with `PlaybackEngine::poll_event`.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Periodic position report while playing.
    TimeUpdate {
        position: Duration,
        duration: Option<Duration>,
    },
    /// The loaded source played to its end.
    Ended,
    /// The loaded source failed after it started (e.g. a corrupt frame).
    Failed(String),
}

pub trait PlaybackEngine {
    /// Replace the loaded source with `track`, paused at position zero.
    ///
    /// The previous source is released before the new one is opened.
    fn load(&mut self, track: &Track) -> Result<()>;

    /// Release the loaded source, if any.
    fn unload(&mut self);

    fn play(&mut self);

    fn pause(&mut self);

    fn seek(&mut self, position: Duration);

    fn position(&self) -> Duration;

    /// Length of the loaded source, when known.
    fn duration(&self) -> Option<Duration>;

    fn poll_event(&mut self) -> Option<EngineEvent>;
}
