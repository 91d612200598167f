use std::time::Duration;

/// Horizontal extent of the indicator in pointer coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Bounds {
    left: f64,
    width: f64,
}

/// Mirrors the playback position as a percentage and turns pointer input
/// into seek fractions.
///
/// Drag capture starts on `pointer_down` and lasts until `pointer_up`, no
/// matter where the pointer moves in between. A release always ends the
/// capture; moves observed afterwards are ignored.
#[derive(Debug, Default)]
pub struct ProgressBar {
    percent: f64,
    dragging: bool,
    bounds: Option<Bounds>,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value in `[0, 100]`.
    pub fn percent(&self) -> f64 {
        self.percent
    }

    #[cfg(test)]
    pub fn fraction(&self) -> f64 {
        self.percent / 100.0
    }

    pub fn set_fraction(&mut self, fraction: f64) {
        if fraction.is_finite() {
            self.percent = fraction.clamp(0.0, 1.0) * 100.0;
        }
    }

    pub fn reset(&mut self) {
        self.percent = 0.0;
    }

    /// Follow a position report. Leaves the value alone while the duration
    /// is unknown or zero; returns whether the value was updated.
    pub fn on_time_update(&mut self, position: Duration, duration: Option<Duration>) -> bool {
        let Some(total) = duration.filter(|d| !d.is_zero()) else {
            return false;
        };
        let ratio = position.as_secs_f64() / total.as_secs_f64();
        if !ratio.is_finite() {
            return false;
        }
        self.percent = (ratio * 100.0).clamp(0.0, 100.0);
        true
    }

    pub fn set_bounds(&mut self, left: f64, width: f64) {
        self.bounds = Some(Bounds { left, width });
    }

    /// Map a pointer x coordinate to a fraction of the bar, clamped to `[0, 1]`.
    pub fn fraction_at(&self, x: f64) -> Option<f64> {
        let b = self.bounds?;
        if b.width <= 0.0 {
            return Some(0.0);
        }
        Some(((x - b.left) / b.width).clamp(0.0, 1.0))
    }

    /// Begin drag capture at `x`; returns the fraction to seek to.
    pub fn pointer_down(&mut self, x: f64) -> Option<f64> {
        let f = self.fraction_at(x)?;
        self.dragging = true;
        Some(f)
    }

    /// Pointer moved anywhere; yields a fraction only while capturing.
    pub fn pointer_move(&mut self, x: f64) -> Option<f64> {
        if !self.dragging {
            return None;
        }
        self.fraction_at(x)
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
