//! Commands, shared handles and small types used by the audio subsystem.

use std::fs::File;
use std::io::BufReader;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ringbuf::HeapRb;
use rodio::Decoder;

use crate::engine::EngineEvent;

/// A decoded file, opened on the caller's side and handed to the audio thread.
pub type FileSource = Decoder<BufReader<File>>;

/// Mono samples captured from the live source for the analyser.
pub type SampleBuffer = Arc<Mutex<HeapRb<f32>>>;

pub(super) enum AudioCmd {
    /// Replace the current sink with `source`, paused at zero.
    Load {
        source: FileSource,
        generation: u64,
        duration: Option<Duration>,
    },
    Play,
    Pause,
    Seek(Duration),
    /// Stop and drop the current sink.
    Unload,
    Quit,
}

/// An engine event stamped with the load it belongs to.
pub(super) type Tagged = (u64, EngineEvent);

/// Playback position written by the audio thread and read by the engine handle.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Load the fields below describe.
    pub generation: u64,
    pub position: Duration,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
