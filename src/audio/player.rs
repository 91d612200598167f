use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, warn};
use ringbuf::HeapRb;
use rodio::Source;

use crate::config::AudioSettings;
use crate::engine::{EngineEvent, PlaybackEngine};
use crate::error::{Error, Result};
use crate::library::Track;

use super::analyser::Analyser;
use super::sink::open_source;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo, SampleBuffer, Tagged};

/// `PlaybackEngine` backed by rodio on a dedicated audio thread.
///
/// Every load gets a new generation number; events the thread raised for an
/// older load are discarded when polled, so a late "ended" from a replaced
/// track never reaches the controller.
pub struct RodioEngine {
    tx: Sender<AudioCmd>,
    events: Receiver<Tagged>,
    playback: PlaybackHandle,
    samples: SampleBuffer,
    generation: u64,
    loaded: bool,
    duration: Option<Duration>,
    join: Option<JoinHandle<()>>,
}

impl RodioEngine {
    /// Open the default output device and start the audio thread.
    pub fn new(settings: &AudioSettings) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<Tagged>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let samples: SampleBuffer = Arc::new(Mutex::new(HeapRb::new(settings.sample_buffer_len)));

        let join = spawn_audio_thread(
            rx,
            event_tx,
            ready_tx,
            playback.clone(),
            samples.clone(),
            Duration::from_millis(settings.tick_ms.max(1)),
        );

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => {
                let _ = join.join();
                return Err(Error::Output(reason));
            }
            Err(_) => return Err(Error::EngineGone),
        }

        Ok(Self {
            tx,
            events: event_rx,
            playback,
            samples,
            generation: 0,
            loaded: false,
            duration: None,
            join: Some(join),
        })
    }

    /// An analyser reading the samples this engine plays.
    pub fn analyser(&self, settings: &AudioSettings) -> Analyser {
        Analyser::new(self.samples.clone(), settings)
    }

    fn send(&self, cmd: AudioCmd) -> Result<()> {
        self.tx.send(cmd).map_err(|_| Error::EngineGone)
    }

    fn send_or_warn(&self, cmd: AudioCmd) {
        if let Err(e) = self.send(cmd) {
            warn!("audio: {e}");
        }
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn quit(&mut self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
        self.loaded = false;
    }
}

impl PlaybackEngine for RodioEngine {
    fn load(&mut self, track: &Track) -> Result<()> {
        self.unload();

        let source = open_source(track)?;
        let duration = source.total_duration().or(track.duration);
        self.generation += 1;
        self.send(AudioCmd::Load {
            source,
            generation: self.generation,
            duration,
        })?;
        debug!("audio: load {} as generation {}", track.path.display(), self.generation);

        self.loaded = true;
        self.duration = duration;
        Ok(())
    }

    fn unload(&mut self) {
        if !self.loaded {
            return;
        }
        self.loaded = false;
        self.duration = None;
        self.send_or_warn(AudioCmd::Unload);
    }

    fn play(&mut self) {
        if self.loaded {
            self.send_or_warn(AudioCmd::Play);
        }
    }

    fn pause(&mut self) {
        if self.loaded {
            self.send_or_warn(AudioCmd::Pause);
        }
    }

    fn seek(&mut self, position: Duration) {
        if !self.loaded {
            return;
        }
        if let Ok(mut info) = self.playback.lock() {
            if info.generation == self.generation {
                info.position = position;
            }
        }
        self.send_or_warn(AudioCmd::Seek(position));
    }

    fn position(&self) -> Duration {
        if !self.loaded {
            return Duration::ZERO;
        }
        match self.playback.lock() {
            Ok(info) if info.generation == self.generation => info.position,
            _ => Duration::ZERO,
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        loop {
            match self.events.try_recv() {
                Ok(tagged) => {
                    if let Some(event) = accept_event(&mut self.loaded, self.generation, tagged) {
                        return Some(event);
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    if self.loaded {
                        self.loaded = false;
                        return Some(EngineEvent::Failed(Error::EngineGone.to_string()));
                    }
                    return None;
                }
            }
        }
    }
}

/// Pass `tagged` through only if it belongs to the live load `current`.
///
/// Ended and Failed clear `loaded`: the thread has already dropped the sink.
pub(super) fn accept_event(
    loaded: &mut bool,
    current: u64,
    (generation, event): Tagged,
) -> Option<EngineEvent> {
    if !*loaded || generation != current {
        return None;
    }
    if matches!(event, EngineEvent::Ended | EngineEvent::Failed(_)) {
        *loaded = false;
    }
    Some(event)
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.quit();
    }
}
