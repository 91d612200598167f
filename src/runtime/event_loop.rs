use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event};
use log::{debug, warn};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode};
use crate::config;
use crate::engine::PlaybackEngine;
use crate::ui;
use crate::visualizer::FrameTicker;

/// Everything the main loop reacts to, in arrival order.
#[derive(Debug)]
pub enum AppEvent {
    Input(Event),
    Frame,
}

/// Background reader turning terminal input into `AppEvent::Input`.
pub struct InputReader {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputReader {
    pub fn spawn(tx: mpsc::Sender<AppEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Acquire) {
                match event::poll(Duration::from_millis(50)) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        warn!("input: poll failed: {e}");
                        break;
                    }
                }
                match event::read() {
                    Ok(ev) => {
                        if tx.send(AppEvent::Input(ev)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("input: read failed: {e}");
                        break;
                    }
                }
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start or stop the frame ticker so it runs exactly while the bars are shown.
fn sync_ticker(
    ticker: &mut Option<FrameTicker>,
    shown: bool,
    fps: u32,
    tx: &mpsc::Sender<AppEvent>,
) {
    match (shown, ticker.is_some()) {
        (true, false) => {
            let tx = tx.clone();
            *ticker = Some(FrameTicker::with_fps(fps, move || {
                tx.send(AppEvent::Frame).is_ok()
            }));
        }
        (false, true) => {
            if let Some(mut t) = ticker.take() {
                t.stop();
            }
        }
        _ => {}
    }
}

/// Apply one event; returns `true` when shutdown was requested.
fn handle<E: PlaybackEngine>(app: &mut App<E>, event: AppEvent) -> bool {
    match event {
        AppEvent::Input(ev) => app.on_event(ev),
        AppEvent::Frame => {
            app.on_frame();
            false
        }
    }
}

/// Main loop: drain engine events, draw, then wait for the next input,
/// frame or tick. Returns `Ok(())` when shutdown is requested.
pub fn run<E: PlaybackEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<E>,
    tx: &mpsc::Sender<AppEvent>,
    rx: &mpsc::Receiver<AppEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.audio.tick_ms.max(1));
    let mut ticker: Option<FrameTicker> = None;

    let result = loop {
        sync_ticker(&mut ticker, app.show_visualizer, settings.visualizer.fps, tx);
        app.player.pump_events();

        let size = terminal.size()?;
        let areas = ui::compute_areas(
            Rect::new(0, 0, size.width, size.height),
            app.show_visualizer,
            matches!(app.mode, InputMode::AddPath(_)),
        );
        let hits = areas.hit_areas(app);
        app.set_areas(hits);
        terminal.draw(|f| ui::draw(f, app, &areas, settings))?;

        let first = match rx.recv_timeout(tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break Ok(()),
        };
        // Batch whatever else is queued so frames never pile up behind a redraw.
        let mut quit = handle(app, first);
        while !quit {
            match rx.try_recv() {
                Ok(ev) => quit = handle(app, ev),
                Err(_) => break,
            }
        }
        if quit {
            debug!("quit requested");
            break Ok(());
        }
    };

    if let Some(mut t) = ticker.take() {
        t.stop();
    }
    result
}
