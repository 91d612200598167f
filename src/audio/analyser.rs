//! Frequency analysis of the captured samples.
//!
//! Produces byte magnitudes the same way a Web Audio analyser node does:
//! Blackman window, magnitude normalised by the window length, exponential
//! smoothing between frames, then a linear dB-to-byte mapping.

use std::f32::consts::PI;
use std::sync::Arc;

use ringbuf::traits::*;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::config::AudioSettings;
use crate::visualizer::SpectrumSource;

use super::types::SampleBuffer;

pub struct Analyser {
    buffer: SampleBuffer,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl Analyser {
    pub fn new(buffer: SampleBuffer, settings: &AudioSettings) -> Self {
        let n = settings.fft_size;
        let fft = FftPlanner::<f32>::new().plan_fft_forward(n);
        Self {
            buffer,
            fft,
            window: blackman(n),
            scratch: vec![Complex::new(0.0, 0.0); n],
            smoothed: vec![0.0; n / 2],
            smoothing: settings.smoothing_time_constant,
            min_db: settings.min_decibels,
            max_db: settings.max_decibels,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    /// Copy the most recent `fft_size` samples into the scratch buffer,
    /// zero-filling the front when fewer have been captured.
    fn load_window(&mut self) {
        let n = self.fft_size();
        self.scratch.fill(Complex::new(0.0, 0.0));

        let Ok(buf) = self.buffer.lock() else {
            return;
        };
        let available = buf.occupied_len();
        let take = available.min(n);
        let offset = n - take;
        for (i, &s) in buf.iter().skip(available - take).enumerate() {
            self.scratch[offset + i] = Complex::new(s * self.window[offset + i], 0.0);
        }
    }

    /// Run one analysis frame and update the smoothed magnitudes.
    fn analyse(&mut self) {
        self.load_window();
        self.fft.process(&mut self.scratch);

        let n = self.fft_size() as f32;
        let tau = self.smoothing;
        for (prev, bin) in self.smoothed.iter_mut().zip(&self.scratch) {
            let magnitude = bin.norm() / n;
            let next = tau * *prev + (1.0 - tau) * magnitude;
            *prev = if next.is_finite() { next } else { 0.0 };
        }
    }

    fn to_byte(&self, magnitude: f32) -> u8 {
        if magnitude <= 0.0 {
            return 0;
        }
        let db = 20.0 * magnitude.log10();
        let scaled = 255.0 * (db - self.min_db) / (self.max_db - self.min_db);
        if !scaled.is_finite() {
            return 0;
        }
        scaled.floor().clamp(0.0, 255.0) as u8
    }
}

impl SpectrumSource for Analyser {
    fn frequency_bin_count(&self) -> usize {
        self.smoothed.len()
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.analyse();
        for (dst, &m) in out.iter_mut().zip(&self.smoothed) {
            *dst = self.to_byte(m);
        }
    }
}

fn blackman(n: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            A0 - A1 * (2.0 * PI * x).cos() + A2 * (4.0 * PI * x).cos()
        })
        .collect()
}
