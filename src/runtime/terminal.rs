use std::io::{self, Write};

use crossterm::cursor::Show;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use log::warn;

/// Switch `out` to the alternate screen with mouse and paste reporting on.
pub fn enter<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(
        out,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
}

/// Undo `enter` and raw mode. Every step runs even when an earlier one
/// fails; failures are logged and counted.
pub fn restore<W: Write>(out: &mut W, disable_raw: impl FnOnce() -> io::Result<()>) -> usize {
    let mut failures = 0;
    if let Err(e) = disable_raw() {
        warn!("terminal: disabling raw mode failed: {e}");
        failures += 1;
    }
    if let Err(e) = execute!(
        out,
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen,
        Show
    ) {
        warn!("terminal: leaving the alternate screen failed: {e}");
        failures += 1;
    }
    failures
}
