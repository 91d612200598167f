use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::*;
use crate::config::VisualizerSettings;

/// Source that returns the same bytes every frame.
struct Fixed(Vec<u8>);

impl SpectrumSource for Fixed {
    fn frequency_bin_count(&self) -> usize {
        self.0.len()
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        out.copy_from_slice(&self.0);
    }
}

#[derive(Default)]
struct Recording {
    width: f64,
    height: f64,
    clears: usize,
    rects: Vec<(f64, f64, f64, f64, Rgb)>,
}

impl DrawSurface for Recording {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.rects.clear();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        self.rects.push((x, y, w, h, color));
    }
}

fn visualizer(data: Vec<u8>) -> Visualizer {
    Visualizer::new(Box::new(Fixed(data)), &VisualizerSettings::default())
}

#[test]
fn draws_one_bottom_anchored_bar_per_bin() {
    let mut v = visualizer(vec![255, 0, 51, 102]);
    let mut surface = Recording {
        width: 40.0,
        height: 100.0,
        ..Recording::default()
    };
    v.sample();
    v.draw(&mut surface);

    assert_eq!(surface.clears, 1);
    assert_eq!(surface.rects.len(), 4);

    // width / bins * 2 = 20, gap 1
    let xs: Vec<f64> = surface.rects.iter().map(|r| r.0).collect();
    assert_eq!(xs, vec![0.0, 21.0, 42.0, 63.0]);
    for r in &surface.rects {
        assert_eq!(r.2, 20.0);
        assert!((r.1 + r.3 - 100.0).abs() < 1e-9);
    }
    assert_eq!(surface.rects[0].3, 100.0);
    assert_eq!(surface.rects[1].3, 0.0);
    assert!((surface.rects[2].3 - 20.0).abs() < 1e-9);
}

#[test]
fn bar_colour_ramps_blue_and_saturates() {
    let mut v = visualizer(vec![10; 128]);
    let mut surface = Recording {
        width: 256.0,
        height: 10.0,
        ..Recording::default()
    };
    v.sample();
    v.draw(&mut surface);

    assert_eq!(surface.rects[0].4, Rgb(50, 50, 0));
    assert_eq!(surface.rects[3].4, Rgb(50, 50, 12));
    assert_eq!(surface.rects[63].4, Rgb(50, 50, 252));
    assert_eq!(surface.rects[64].4, Rgb(50, 50, 255));
    assert_eq!(surface.rects[127].4, Rgb(50, 50, 255));
}

#[test]
fn gap_and_width_scale_come_from_settings() {
    let settings = VisualizerSettings {
        bar_gap: 0.0,
        width_scale: 1.0,
        ..VisualizerSettings::default()
    };
    let mut v = Visualizer::new(Box::new(Fixed(vec![1, 2])), &settings);
    let mut surface = Recording {
        width: 10.0,
        height: 8.0,
        ..Recording::default()
    };
    v.sample();
    v.draw(&mut surface);
    assert_eq!(surface.rects[1].0, 5.0);
    assert_eq!(surface.rects[1].2, 5.0);
}

#[test]
fn empty_source_only_clears() {
    let mut v = visualizer(Vec::new());
    let mut surface = Recording {
        width: 10.0,
        height: 10.0,
        ..Recording::default()
    };
    v.sample();
    v.draw(&mut surface);
    assert_eq!(surface.clears, 1);
    assert!(surface.rects.is_empty());
}

#[test]
fn buffer_surface_uses_eighth_blocks_for_bar_tops() {
    let area = Rect::new(0, 0, 2, 2);
    let mut buf = Buffer::empty(area);
    let mut surface = BufferSurface::new(&mut buf, area);
    assert_eq!(surface.height(), 16.0);

    // 11 of 16 units: one full row plus three eighths
    surface.clear();
    surface.fill_rect(0.0, 5.0, 1.0, 11.0, Rgb(50, 50, 0));

    assert_eq!(buf[(0, 1)].symbol(), "█");
    assert_eq!(buf[(0, 0)].symbol(), "▃");
    assert_eq!(buf[(0, 0)].fg, Color::Rgb(50, 50, 0));
    assert_eq!(buf[(1, 0)].symbol(), " ");
    assert_eq!(buf[(1, 1)].symbol(), " ");
}

#[test]
fn buffer_surface_clips_to_its_area() {
    let area = Rect::new(0, 0, 3, 1);
    let mut buf = Buffer::empty(area);
    let mut surface = BufferSurface::new(&mut buf, area);
    surface.fill_rect(2.0, 0.0, 10.0, 8.0, Rgb(1, 2, 3));
    surface.fill_rect(-5.0, 0.0, 1.0, 8.0, Rgb(1, 2, 3));

    assert_eq!(buf[(0, 0)].symbol(), " ");
    assert_eq!(buf[(2, 0)].symbol(), "█");
}

#[test]
fn ticker_delivers_nothing_after_stop() {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = count.clone();
    let mut ticker = FrameTicker::start(Duration::from_millis(1), move || {
        seen.fetch_add(1, Ordering::SeqCst);
        true
    });

    while count.load(Ordering::SeqCst) < 3 {
        thread::sleep(Duration::from_millis(1));
    }
    ticker.stop();
    assert!(!ticker.is_running());

    let at_stop = count.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(count.load(Ordering::SeqCst), at_stop);
}

#[test]
fn ticker_ends_when_the_callback_declines() {
    let mut ticker = FrameTicker::start(Duration::from_millis(1), || false);
    let mut waited = 0;
    while ticker.is_running() && waited < 1000 {
        thread::sleep(Duration::from_millis(1));
        waited += 1;
    }
    assert!(!ticker.is_running());
    ticker.stop();
}

#[test]
fn frame_interval_is_clamped_to_the_supported_rates() {
    use super::ticker::frame_interval;

    assert_eq!(frame_interval(60), Duration::from_micros(16_666));
    assert_eq!(frame_interval(0), Duration::from_secs(1));
    assert_eq!(frame_interval(MAX_FPS), Duration::from_millis(1));
    assert_eq!(frame_interval(5_000_000), Duration::from_millis(1));
}
