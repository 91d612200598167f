//! In-memory engine used by controller and app tests.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use rodio::decoder::DecoderError;

use crate::engine::{EngineEvent, PlaybackEngine};
use crate::error::{Error, Result};
use crate::library::Track;

pub(crate) struct FakeEngine {
    pub loaded: Option<PathBuf>,
    pub live_sources: usize,
    pub max_live_sources: usize,
    pub loads: usize,
    pub paused: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    /// Duration reported for tracks that carry none of their own.
    pub default_duration: Option<Duration>,
    /// File names whose `load` fails with a decode error.
    pub unplayable: Vec<String>,
    pub events: VecDeque<EngineEvent>,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self {
            loaded: None,
            live_sources: 0,
            max_live_sources: 0,
            loads: 0,
            paused: true,
            position: Duration::ZERO,
            duration: None,
            default_duration: Some(Duration::from_secs(200)),
            unplayable: Vec::new(),
            events: VecDeque::new(),
        }
    }
}

impl FakeEngine {
    pub fn unplayable(names: &[&str]) -> Self {
        Self {
            unplayable: names.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Queue a position report for the current position.
    pub fn tick(&mut self) {
        self.events.push_back(EngineEvent::TimeUpdate {
            position: self.position,
            duration: self.duration,
        });
    }

    /// Play the loaded source to its end.
    pub fn finish(&mut self) {
        if let Some(d) = self.duration {
            self.position = d;
        }
        self.events.push_back(EngineEvent::Ended);
    }
}

impl PlaybackEngine for FakeEngine {
    fn load(&mut self, track: &Track) -> Result<()> {
        self.unload();

        let name = track
            .path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.unplayable.contains(&name) {
            return Err(Error::Decode {
                path: track.path.clone(),
                source: DecoderError::UnrecognizedFormat,
            });
        }

        self.loads += 1;
        self.live_sources += 1;
        self.max_live_sources = self.max_live_sources.max(self.live_sources);
        self.loaded = Some(track.path.clone());
        self.paused = true;
        self.position = Duration::ZERO;
        self.duration = track.duration.or(self.default_duration);
        Ok(())
    }

    fn unload(&mut self) {
        if self.loaded.take().is_some() {
            self.live_sources -= 1;
        }
        self.paused = true;
        self.position = Duration::ZERO;
        self.duration = None;
    }

    fn play(&mut self) {
        if self.loaded.is_some() {
            self.paused = false;
        }
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn seek(&mut self, position: Duration) {
        self.position = match self.duration {
            Some(d) => position.min(d),
            None => position,
        };
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.events.pop_front()
    }
}
