use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::{DrawSurface, Rgb};

/// Vertical units per terminal row.
const EIGHTHS: f64 = 8.0;

const LOWER: [&str; 8] = ["▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// A `DrawSurface` over a region of a ratatui buffer.
///
/// One horizontal unit is one column; each row holds eight vertical units,
/// so bar tops land on the nearest eighth using the lower block glyphs.
pub struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        let area = area.intersection(buf.area);
        Self { buf, area }
    }

    fn columns(&self, x: f64, w: f64) -> std::ops::Range<u16> {
        let start = x.round();
        let mut end = (x + w).round();
        if end <= start {
            end = start + 1.0;
        }
        let width = f64::from(self.area.width);
        let start = start.clamp(0.0, width) as u16;
        let end = end.clamp(0.0, width) as u16;
        start..end.max(start)
    }
}

impl DrawSurface for BufferSurface<'_> {
    fn width(&self) -> f64 {
        f64::from(self.area.width)
    }

    fn height(&self) -> f64 {
        f64::from(self.area.height) * EIGHTHS
    }

    fn clear(&mut self) {
        for y in self.area.top()..self.area.bottom() {
            for x in self.area.left()..self.area.right() {
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.reset();
                }
            }
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        let finite = x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite();
        if !finite || w <= 0.0 || h <= 0.0 {
            return;
        }
        let fg = Color::Rgb(color.0, color.1, color.2);
        let top = y;
        let bottom = y + h;

        for row in 0..self.area.height {
            let cell_top = f64::from(row) * EIGHTHS;
            let cell_bottom = cell_top + EIGHTHS;
            let covered = (bottom.min(cell_bottom) - top.max(cell_top)).clamp(0.0, EIGHTHS);
            let eighths = covered.round() as usize;
            if eighths == 0 {
                continue;
            }

            let glyph = if eighths >= 8 {
                LOWER[7]
            } else if bottom >= cell_bottom {
                LOWER[eighths - 1]
            } else if top <= cell_top && eighths >= 4 {
                "▀"
            } else {
                continue;
            };

            for col in self.columns(x, w) {
                let pos = (self.area.x + col, self.area.y + row);
                if let Some(cell) = self.buf.cell_mut(pos) {
                    cell.set_symbol(glyph);
                    cell.set_fg(fg);
                }
            }
        }
    }
}
