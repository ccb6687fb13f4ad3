//! Terminal setup and guaranteed teardown.

use std::io;

use crossterm::cursor;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use lattice_engine::{UiError, UiResult};

/// Holds the terminal in raw mode on the alternate screen. Dropping the
/// guard restores the caller's terminal even when the session errors or
/// panics on the way out.
pub struct TerminalGuard;

impl TerminalGuard {
    /// Enter raw mode and the alternate screen, hiding the cursor.
    pub fn enter() -> UiResult<Self> {
        enable_raw_mode().map_err(terminal_error)?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide).map_err(terminal_error)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    }
}

/// Map an io failure into the presentation error type.
pub fn terminal_error(err: io::Error) -> UiError {
    UiError::Terminal(err.to_string())
}
