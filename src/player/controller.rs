use std::time::Duration;

use log::{debug, info, warn};

use crate::engine::{EngineEvent, PlaybackEngine};
use crate::library::Track;
use crate::playlist::{Playlist, Step, TrackId};

use super::progress::ProgressBar;

/// The playback state of the controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing loaded: never played, or stopped at the end of the playlist.
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Result of an explicit or natural skip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Skip {
    /// The current marker moved to this track and playback was attempted.
    Moved(TrackId),
    /// Forward skip past the last track: playback stopped and was reset.
    EndReached,
    /// Backward skip at the first track (or with nothing current).
    Unchanged,
}

/// Owns the playlist, the engine and the progress indicator, and is the only
/// place that changes the current marker or the playback state.
pub struct Player<E> {
    playlist: Playlist,
    engine: E,
    progress: ProgressBar,
    state: PlaybackState,
    notice: Option<String>,
}

impl<E: PlaybackEngine> Player<E> {
    pub fn new(engine: E) -> Self {
        Self {
            playlist: Playlist::new(),
            engine,
            progress: ProgressBar::new(),
            state: PlaybackState::Idle,
            notice: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressBar {
        &mut self.progress
    }

    #[cfg(test)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn position(&self) -> Duration {
        self.engine.position()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.engine.duration()
    }

    /// The track marked current, if any.
    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.current().and_then(|id| self.playlist.get(id))
    }

    /// The user-visible message left by the last failure, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn append(&mut self, track: Track) -> TrackId {
        debug!("append {}", track.display_name);
        self.playlist.append(track)
    }

    #[cfg(test)]
    pub fn reorder(&mut self, id: TrackId, before: TrackId) -> bool {
        self.playlist.reorder(id, before)
    }

    pub fn drag_over(&mut self, dragging: TrackId, target: TrackId) -> bool {
        self.playlist.drag_over(dragging, target)
    }

    pub fn move_by(&mut self, id: TrackId, delta: isize) -> bool {
        self.playlist.move_by(id, delta)
    }

    /// Remove a track. Removing the loaded track stops playback first.
    pub fn remove(&mut self, id: TrackId) -> Option<Track> {
        if self.playlist.current() == Some(id) {
            self.engine.unload();
            self.progress.reset();
            self.state = PlaybackState::Idle;
        }
        self.playlist.remove(id)
    }

    /// Make `id` current and start playing it.
    ///
    /// The previously loaded source is released before the new one is
    /// opened. On failure the marker stays on `id` (so skipping continues
    /// from there), the player goes idle and a notice is raised. Returns
    /// whether playback started.
    pub fn play(&mut self, id: TrackId) -> bool {
        if !self.playlist.mark_current(id) {
            return false;
        }
        self.engine.unload();
        self.progress.reset();

        let Some(track) = self.playlist.get(id) else {
            return false;
        };

        match self.engine.load(track) {
            Ok(()) => {
                self.engine.play();
                self.state = PlaybackState::Playing;
                debug!("playing {}", track.display_name);
                true
            }
            Err(e) => {
                warn!("cannot play {}: {e}", track.path.display());
                self.notice = Some(format!("cannot play {}: {e}", track.display_name));
                self.state = PlaybackState::Idle;
                false
            }
        }
    }

    /// The play button: pause, resume, or start the current (else first) track.
    pub fn toggle_play_pause(&mut self) {
        match self.state {
            PlaybackState::Playing => {
                self.engine.pause();
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                self.engine.play();
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Idle => {
                let target = self.playlist.current().or_else(|| self.playlist.first());
                if let Some(id) = target {
                    self.play(id);
                }
            }
        }
    }

    pub fn next(&mut self) -> Skip {
        match self.playlist.step_forward() {
            Step::To(id) => {
                self.play(id);
                Skip::Moved(id)
            }
            Step::EndReached => {
                self.stop_at_end();
                Skip::EndReached
            }
        }
    }

    pub fn previous(&mut self) -> Skip {
        match self.playlist.step_back() {
            Some(id) => {
                self.play(id);
                Skip::Moved(id)
            }
            None => Skip::Unchanged,
        }
    }

    /// Going past the last track, by skip or by natural end, stops and resets.
    fn stop_at_end(&mut self) {
        info!("end of playlist");
        self.engine.unload();
        self.playlist.clear_current();
        self.progress.reset();
        self.state = PlaybackState::Idle;
    }

    pub fn on_time_update(&mut self, position: Duration, duration: Option<Duration>) {
        self.progress.on_time_update(position, duration);
    }

    pub fn on_ended(&mut self) -> Skip {
        self.next()
    }

    pub fn on_failed(&mut self, reason: &str) {
        let name = self
            .current_track()
            .map(|t| t.display_name.clone())
            .unwrap_or_default();
        warn!("playback of {name} failed: {reason}");
        self.notice = Some(format!("cannot play {name}: {reason}"));
        self.engine.unload();
        self.progress.reset();
        self.state = PlaybackState::Idle;
    }

    /// Seek to `fraction` of the loaded track. Does nothing while the
    /// duration is unknown.
    pub fn seek_fraction(&mut self, fraction: f64) -> bool {
        if !fraction.is_finite() {
            return false;
        }
        let Some(total) = self.engine.duration().filter(|d| !d.is_zero()) else {
            return false;
        };
        let fraction = fraction.clamp(0.0, 1.0);
        self.engine.seek(total.mul_f64(fraction));
        self.progress.set_fraction(fraction);
        true
    }

    /// Seek relative to the current position, clamped to the track.
    pub fn seek_by(&mut self, seconds: i64) -> bool {
        let Some(total) = self.engine.duration().filter(|d| !d.is_zero()) else {
            return false;
        };
        let target = self.engine.position().as_secs_f64() + seconds as f64;
        let total = total.as_secs_f64();
        self.seek_fraction(target.clamp(0.0, total) / total)
    }

    /// Drain engine notifications; returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.engine.poll_event() {
            handled += 1;
            match event {
                EngineEvent::TimeUpdate { position, duration } => {
                    self.on_time_update(position, duration)
                }
                EngineEvent::Ended => {
                    self.on_ended();
                }
                EngineEvent::Failed(reason) => self.on_failed(&reason),
            }
        }
        handled
    }

    /// Release the loaded source and forget every track.
    pub fn teardown(&mut self) {
        info!("teardown: releasing {} tracks", self.playlist.len());
        self.engine.unload();
        self.playlist.clear();
        self.progress.reset();
        self.state = PlaybackState::Idle;
    }
}
