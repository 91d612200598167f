//! Frequency bars.
//!
//! The visualizer keeps no playback state: on every frame it pulls byte
//! magnitudes from a [`SpectrumSource`] and paints them onto a
//! [`DrawSurface`].

mod surface;
mod ticker;

pub use surface::BufferSurface;
pub use ticker::{FrameTicker, MAX_FPS};

use crate::config::VisualizerSettings;

/// Anything that can report frequency-domain magnitudes as bytes.
pub trait SpectrumSource {
    fn frequency_bin_count(&self) -> usize;

    /// Fill `out` with the latest magnitudes, one byte per bin (0..=255).
    fn byte_frequency_data(&mut self, out: &mut [u8]);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A 2D drawing target with its origin in the top-left corner.
pub trait DrawSurface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb);
}

pub struct Visualizer {
    source: Box<dyn SpectrumSource>,
    data: Vec<u8>,
    bar_gap: f64,
    width_scale: f64,
}

impl Visualizer {
    pub fn new(source: Box<dyn SpectrumSource>, settings: &VisualizerSettings) -> Self {
        let bins = source.frequency_bin_count();
        Self {
            source,
            data: vec![0; bins],
            bar_gap: settings.bar_gap,
            width_scale: settings.width_scale,
        }
    }

    pub fn sample(&mut self) {
        self.source.byte_frequency_data(&mut self.data);
    }

    /// Paint the last sampled magnitudes, one bar per bin, left to right.
    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        surface.clear();
        let bins = self.data.len();
        if bins == 0 {
            return;
        }

        let width = surface.width();
        let height = surface.height();
        let bar_width = width / bins as f64 * self.width_scale;

        let mut x = 0.0;
        for (i, &value) in self.data.iter().enumerate() {
            let bar_height = f64::from(value) / 255.0 * height;
            let color = bar_color(i);
            surface.fill_rect(x, height - bar_height, bar_width, bar_height, color);
            x += bar_width + self.bar_gap;
        }
    }
}

fn bar_color(index: usize) -> Rgb {
    let blue = index.saturating_mul(4).min(255) as u8;
    Rgb(50, 50, blue)
}

#[cfg(test)]
mod tests;
