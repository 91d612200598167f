//! A pass-through source that copies what it plays into the analyser buffer.

use std::time::Duration;

use ringbuf::traits::*;
use rodio::Source;
use rodio::source::SeekError;

use super::types::SampleBuffer;

/// Wraps a source and pushes a mono downmix of every frame it yields into a
/// ring buffer, dropping the oldest samples when full.
pub struct SampleCapture<S> {
    source: S,
    buffer: SampleBuffer,
    frame_sum: f32,
    frame_len: u16,
}

impl<S> SampleCapture<S> {
    pub fn new(source: S, buffer: SampleBuffer) -> Self {
        Self {
            source,
            buffer,
            frame_sum: 0.0,
            frame_len: 0,
        }
    }
}

impl<S: Source> SampleCapture<S> {
    fn capture(&mut self, sample: f32) {
        self.frame_sum += sample;
        self.frame_len += 1;
        if self.frame_len < self.source.channels().max(1) {
            return;
        }

        let mono = self.frame_sum / self.frame_len as f32;
        self.frame_sum = 0.0;
        self.frame_len = 0;
        if let Ok(mut buf) = self.buffer.lock() {
            if buf.is_full() {
                let _ = buf.try_pop();
            }
            let _ = buf.try_push(mono);
        }
    }
}

impl<S: Source> Iterator for SampleCapture<S> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.source.next()?;
        self.capture(sample);
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<S: Source> Source for SampleCapture<S> {
    fn current_span_len(&self) -> Option<usize> {
        self.source.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.frame_sum = 0.0;
        self.frame_len = 0;
        self.source.try_seek(pos)
    }
}
