use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

/// Highest frame rate a ticker runs at.
pub const MAX_FPS: u32 = 1000;

/// Time between frames at `fps`, clamped to `1..=MAX_FPS`.
pub fn frame_interval(fps: u32) -> Duration {
    let fps = u64::from(fps.clamp(1, MAX_FPS));
    Duration::from_micros(1_000_000 / fps)
}

/// Calls a callback at a fixed rate on a background thread until stopped.
///
/// Once `stop` returns the callback is never invoked again. The loop also
/// ends by itself when the callback returns `false` (its receiver is gone).
pub struct FrameTicker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FrameTicker {
    pub fn start<F>(interval: Duration, mut on_frame: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Acquire) {
                thread::park_timeout(interval);
                if stop_flag.load(Ordering::Acquire) || !on_frame() {
                    break;
                }
            }
        });
        debug!("frame ticker started ({interval:?})");
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Ticker running at `fps` frames per second.
    pub fn with_fps<F>(fps: u32, on_frame: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        Self::start(frame_interval(fps), on_frame)
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(h) = self.handle.take() {
            h.thread().unpark();
            let _ = h.join();
            debug!("frame ticker stopped");
        }
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
