use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, warn};
use ringbuf::traits::*;
use rodio::{OutputStreamBuilder, Sink};

use crate::engine::EngineEvent;

use super::capture::SampleCapture;
use super::types::{AudioCmd, PlaybackHandle, SampleBuffer, Tagged};

/// The sink currently playing and what the engine side knows about it.
struct Loaded {
    sink: Sink,
    generation: u64,
    duration: Option<Duration>,
    paused: bool,
}

fn clear_samples(buffer: &SampleBuffer) {
    if let Ok(mut buf) = buffer.lock() {
        buf.clear();
    }
}

/// What a drained sink means: a source with a known length that never moved
/// off zero produced no audio at all.
pub(super) fn end_event(position: Duration, duration: Option<Duration>) -> EngineEvent {
    let played_nothing = position.is_zero() && duration.is_some_and(|d| !d.is_zero());
    if played_nothing {
        EngineEvent::Failed("no audio could be decoded".into())
    } else {
        EngineEvent::Ended
    }
}

/// Spawn the thread that owns the output stream.
///
/// `ready` receives `Ok` once the default output device is open, or the
/// reason it could not be opened (the thread exits in that case).
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<Tagged>,
    ready: SyncSender<Result<(), String>>,
    playback_info: PlaybackHandle,
    samples: SampleBuffer,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };
        // rodio logs to stderr when the stream is dropped, which would land
        // on top of the TUI.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut current: Option<Loaded> = None;
        let mut last_report = Instant::now();

        let set_info = |generation: u64, position: Duration| {
            if let Ok(mut info) = playback_info.lock() {
                info.generation = generation;
                info.position = position;
            }
        };

        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Load {
                    source,
                    generation,
                    duration,
                }) => {
                    if let Some(old) = current.take() {
                        old.sink.stop();
                    }
                    clear_samples(&samples);

                    let sink = Sink::connect_new(stream.mixer());
                    sink.pause();
                    sink.append(SampleCapture::new(source, samples.clone()));
                    debug!("audio: loaded generation {generation}");
                    current = Some(Loaded {
                        sink,
                        generation,
                        duration,
                        paused: true,
                    });
                    set_info(generation, Duration::ZERO);
                }
                Ok(AudioCmd::Play) => {
                    if let Some(l) = current.as_mut() {
                        l.sink.play();
                        l.paused = false;
                        last_report = Instant::now();
                        set_info(l.generation, l.sink.get_pos());
                    }
                }
                Ok(AudioCmd::Pause) => {
                    if let Some(l) = current.as_mut() {
                        l.sink.pause();
                        l.paused = true;
                        set_info(l.generation, l.sink.get_pos());
                    }
                    clear_samples(&samples);
                }
                Ok(AudioCmd::Seek(pos)) => {
                    if let Some(l) = current.as_ref() {
                        if let Err(e) = l.sink.try_seek(pos) {
                            warn!("audio: seek to {pos:?} failed: {e}");
                        }
                        let position = l.sink.get_pos();
                        set_info(l.generation, position);
                        let _ = events.send((
                            l.generation,
                            EngineEvent::TimeUpdate {
                                position,
                                duration: l.duration,
                            },
                        ));
                    }
                }
                Ok(AudioCmd::Unload) => {
                    if let Some(old) = current.take() {
                        old.sink.stop();
                        set_info(old.generation, Duration::ZERO);
                    }
                    clear_samples(&samples);
                }
                Ok(AudioCmd::Quit) | Err(RecvTimeoutError::Disconnected) => {
                    if let Some(old) = current.take() {
                        old.sink.stop();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }

            let Some(l) = current.as_ref() else {
                continue;
            };
            if l.paused {
                continue;
            }

            if l.sink.empty() {
                let position = l.sink.get_pos();
                let _ = events.send((l.generation, end_event(position, l.duration)));
                set_info(l.generation, position);
                current = None;
                clear_samples(&samples);
                continue;
            }

            if last_report.elapsed() >= tick {
                last_report = Instant::now();
                let position = l.sink.get_pos();
                set_info(l.generation, position);
                let _ = events.send((
                    l.generation,
                    EngineEvent::TimeUpdate {
                        position,
                        duration: l.duration,
                    },
                ));
            }
        }
    })
}
