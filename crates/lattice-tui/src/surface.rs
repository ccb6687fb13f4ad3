//! Crossterm implementation of the presentation seam.
//!
//! Everything here is rendering and key plumbing; outcomes live in the
//! engine's menu and puzzle state machines. The terminal is assumed to
//! be in raw mode on the alternate screen (see
//! [`TerminalGuard`](crate::terminal::TerminalGuard)), so lines end in
//! `\r\n` and input arrives as key events.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use lattice_engine::{
    ChoiceMenu, EngineConfig, Hold, Notice, Surface, TextStyle, TimedPuzzle, UiError, UiResult,
};

use crate::terminal::terminal_error;

/// Arrow glyphs for a glitched menu cursor.
const GLITCH_ARROWS: [&str; 5] = ["→ ", "» ", "▓ ", "█ ", "▒ "];

/// Printable ASCII accepted as puzzle and name input.
const PRINTABLE: std::ops::RangeInclusive<char> = ' '..='~';

/// Terminal-backed [`Surface`].
pub struct CrosstermSurface {
    out: io::Stdout,
    typing_delay: Duration,
    rng: StdRng,
}

impl CrosstermSurface {
    /// A surface configured from the session config.
    pub fn new(config: &EngineConfig) -> UiResult<Self> {
        let mut surface = Self {
            out: io::stdout(),
            typing_delay: config.typing_delay(),
            rng: StdRng::from_os_rng(),
        };
        surface.clear()?;
        Ok(surface)
    }

    fn apply_style(&mut self, style: TextStyle) -> UiResult<()> {
        let (color, bold) = match style {
            TextStyle::Plain => (Color::Reset, false),
            TextStyle::Narration => (Color::DarkGrey, false),
            TextStyle::System => (Color::Green, false),
            TextStyle::Warning => (Color::Yellow, true),
            TextStyle::Alert => (Color::Red, true),
            TextStyle::Dialogue => (Color::Cyan, true),
            TextStyle::Whisper => (Color::Magenta, true),
            TextStyle::Success => (Color::Green, true),
        };
        queue!(self.out, SetForegroundColor(color)).map_err(terminal_error)?;
        if bold {
            queue!(self.out, SetAttribute(Attribute::Bold)).map_err(terminal_error)?;
        }
        Ok(())
    }

    fn write_styled(&mut self, text: &str, style: TextStyle) -> UiResult<()> {
        self.apply_style(style)?;
        queue!(self.out, Print(text), ResetColor).map_err(terminal_error)?;
        Ok(())
    }

    fn flush(&mut self) -> UiResult<()> {
        self.out.flush().map_err(terminal_error)
    }

    /// Next key press. Ctrl-C becomes the interrupt error here, so every
    /// blocking prompt honors it without its own check.
    fn read_key(&mut self) -> UiResult<KeyEvent> {
        loop {
            match event::read().map_err(terminal_error)? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if is_interrupt(&key) {
                        return Err(UiError::Interrupted);
                    }
                    return Ok(key);
                }
                _ => {}
            }
        }
    }

    /// Like [`read_key`](Self::read_key) but gives up after `timeout`.
    fn poll_key(&mut self, timeout: Duration) -> UiResult<Option<KeyEvent>> {
        if !event::poll(timeout).map_err(terminal_error)? {
            return Ok(None);
        }
        match event::read().map_err(terminal_error)? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if is_interrupt(&key) {
                    return Err(UiError::Interrupted);
                }
                Ok(Some(key))
            }
            _ => Ok(None),
        }
    }

    fn draw_menu(&mut self, menu: &mut ChoiceMenu, row: u16) -> UiResult<()> {
        queue!(self.out, cursor::MoveTo(0, row), Clear(ClearType::FromCursorDown))
            .map_err(terminal_error)?;
        let selected = menu.selected();
        let glitched = menu.glitched();
        for (idx, option) in menu.options().iter().enumerate() {
            let arrow = if idx != selected {
                "  "
            } else if glitched {
                GLITCH_ARROWS.choose(&mut self.rng).copied().unwrap_or("→ ")
            } else {
                "→ "
            };
            let style = if idx == selected {
                TextStyle::Success
            } else {
                TextStyle::Plain
            };
            self.write_styled(&format!("{arrow}{option}"), style)?;
            queue!(self.out, Print("\r\n")).map_err(terminal_error)?;
        }
        self.flush()
    }

    /// Draw a double-line box centered on screen and return the row of
    /// its first body line.
    fn draw_frame(&mut self, title: &str, body_rows: usize) -> UiResult<(u16, u16, u16)> {
        let (cols, rows) = terminal::size().map_err(terminal_error)?;
        let (x, width) = frame_layout(title.chars().count(), cols);
        let height = body_rows as u16 + 4;
        let y = rows.saturating_sub(height) / 2;

        let inner = (width as usize).saturating_sub(2);
        let mut top = format!("╔═ {title} ");
        while top.chars().count() < (width as usize).saturating_sub(1) {
            top.push('═');
        }
        top.push('╗');

        queue!(self.out, cursor::MoveTo(x, y)).map_err(terminal_error)?;
        self.write_styled(&top, TextStyle::Whisper)?;
        for i in 0..height - 2 {
            queue!(self.out, cursor::MoveTo(x, y + 1 + i)).map_err(terminal_error)?;
            self.write_styled(&format!("║{}║", " ".repeat(inner)), TextStyle::Whisper)?;
        }
        queue!(self.out, cursor::MoveTo(x, y + height - 1)).map_err(terminal_error)?;
        self.write_styled(&format!("╚{}╝", "═".repeat(inner)), TextStyle::Whisper)?;
        Ok((x, y + 2, width))
    }

    fn centered_in_frame(
        &mut self,
        x: u16,
        row: u16,
        width: u16,
        text: &str,
        style: TextStyle,
    ) -> UiResult<()> {
        let len = text.chars().count() as u16;
        let offset = width.saturating_sub(len) / 2;
        queue!(self.out, cursor::MoveTo(x + offset, row)).map_err(terminal_error)?;
        self.write_styled(text, style)
    }

    fn choice_row(labels: &[String], selected: usize) -> String {
        labels
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                if idx == selected {
                    format!("[ {label} ]")
                } else {
                    format!("  {label}  ")
                }
            })
            .collect::<Vec<_>>()
            .join("   ")
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Smallest frame that still has borders and a one-column interior.
const MIN_FRAME_WIDTH: usize = 6;

/// Frame column and width for a title on a terminal `cols` wide.
/// Prefers 40 columns, grows for long titles, shrinks on narrow
/// terminals, and never drops below the border minimum.
fn frame_layout(title_len: usize, cols: u16) -> (u16, u16) {
    let desired = (title_len + 8).max(40);
    let mut width = desired.min(cols as usize);
    if width < MIN_FRAME_WIDTH {
        width = MIN_FRAME_WIDTH;
    }
    let x = (cols as usize).saturating_sub(width) / 2;
    (x as u16, width as u16)
}

impl Surface for CrosstermSurface {
    fn line(&mut self, text: &str, style: TextStyle) -> UiResult<()> {
        self.write_styled(text, style)?;
        queue!(self.out, Print("\r\n")).map_err(terminal_error)?;
        self.flush()
    }

    fn type_out(&mut self, text: &str, style: TextStyle) -> UiResult<()> {
        let mut skip = self.typing_delay.is_zero();
        let chars: Vec<char> = text.chars().collect();
        for (idx, c) in chars.iter().enumerate() {
            self.write_styled(&c.to_string(), style)?;
            if skip {
                continue;
            }
            self.flush()?;
            // Any key fast-forwards the rest of the line.
            if self.poll_key(self.typing_delay)?.is_some() {
                skip = true;
                let rest: String = chars[idx + 1..].iter().collect();
                self.write_styled(&rest, style)?;
                break;
            }
        }
        queue!(self.out, Print("\r\n")).map_err(terminal_error)?;
        self.flush()
    }

    fn pause(&mut self, duration: Duration) -> UiResult<()> {
        // Sleep in short slices so an interrupt lands promptly and any
        // other key cuts the pause short.
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            let slice = (deadline - now).min(Duration::from_millis(50));
            if self.poll_key(slice)?.is_some() {
                return Ok(());
            }
        }
    }

    fn clear(&mut self) -> UiResult<()> {
        execute!(self.out, Clear(ClearType::All), cursor::MoveTo(0, 0)).map_err(terminal_error)
    }

    fn choose(&mut self, prompt: Option<&str>, menu: &mut ChoiceMenu) -> UiResult<usize> {
        if let Some(prompt) = prompt {
            self.line(prompt, TextStyle::Plain)?;
        }
        let (_, row) = cursor::position().map_err(terminal_error)?;
        loop {
            self.draw_menu(menu, row)?;
            match self.read_key()?.code {
                KeyCode::Up => menu.move_up(),
                KeyCode::Down => menu.move_down(),
                KeyCode::Enter => {
                    queue!(
                        self.out,
                        cursor::MoveTo(0, row + menu.len() as u16),
                        Print("\r\n")
                    )
                    .map_err(terminal_error)?;
                    self.flush()?;
                    return Ok(menu.selected());
                }
                _ => {}
            }
        }
    }

    fn run_puzzle(&mut self, puzzle: &mut TimedPuzzle) -> UiResult<bool> {
        self.clear()?;
        puzzle.begin(Instant::now());
        let outcome = loop {
            let now = Instant::now();
            if let Some(outcome) = puzzle.poll(now) {
                break outcome;
            }

            let (x, body, width) = self.draw_frame("STABILIZE NODE", 6)?;
            self.centered_in_frame(
                x,
                body,
                width,
                &format!("[ {} ]", puzzle.scrambled()),
                TextStyle::Whisper,
            )?;
            let remaining = puzzle.remaining(now).as_secs_f64();
            let timer_style = if remaining < 3.0 {
                TextStyle::Alert
            } else {
                TextStyle::Warning
            };
            self.centered_in_frame(
                x,
                body + 2,
                width,
                &format!("TIME REMAINING: {remaining:.1}s"),
                timer_style,
            )?;
            self.centered_in_frame(
                x,
                body + 4,
                width,
                &format!("> {}", puzzle.input()),
                TextStyle::Success,
            )?;
            self.flush()?;

            if let Some(key) = self.poll_key(Duration::from_millis(30))? {
                match key.code {
                    KeyCode::Backspace => puzzle.backspace(),
                    KeyCode::Char(c) if PRINTABLE.contains(&c) => puzzle.push_char(c),
                    _ => {}
                }
            }
        };
        self.clear()?;
        Ok(outcome)
    }

    fn message_box(&mut self, notice: &Notice) -> UiResult<Option<usize>> {
        self.clear()?;
        let extra = usize::from(!notice.choices.is_empty()) * 2;
        let mut selected = 0usize;
        loop {
            let (x, body, width) = self.draw_frame(&notice.title, notice.lines.len() + extra)?;
            for (idx, line) in notice.lines.iter().enumerate() {
                self.centered_in_frame(x, body + idx as u16, width, &line.text, line.style)?;
            }
            if notice.choices.is_empty() {
                self.flush()?;
                match notice.hold {
                    Hold::Duration(duration) => self.pause(duration)?,
                    Hold::Key => {
                        let _ = self.read_key()?;
                    }
                }
                self.clear()?;
                return Ok(None);
            }

            let row = Self::choice_row(&notice.choices, selected);
            self.centered_in_frame(
                x,
                body + notice.lines.len() as u16 + 1,
                width,
                &row,
                TextStyle::Success,
            )?;
            self.flush()?;
            match self.read_key()?.code {
                KeyCode::Left if selected > 0 => selected -= 1,
                KeyCode::Right if selected + 1 < notice.choices.len() => selected += 1,
                KeyCode::Enter => {
                    self.clear()?;
                    return Ok(Some(selected));
                }
                _ => {}
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> UiResult<String> {
        self.write_styled(prompt, TextStyle::System)?;
        queue!(self.out, cursor::Show).map_err(terminal_error)?;
        self.flush()?;
        let mut input = String::new();
        let result = loop {
            match self.read_key()?.code {
                KeyCode::Enter => break Ok(input),
                KeyCode::Backspace => {
                    if input.pop().is_some() {
                        queue!(self.out, Print("\u{8} \u{8}")).map_err(terminal_error)?;
                        self.flush()?;
                    }
                }
                KeyCode::Char(c) if PRINTABLE.contains(&c) => {
                    input.push(c);
                    self.write_styled(&c.to_string(), TextStyle::System)?;
                    self.flush()?;
                }
                _ => {}
            }
        };
        queue!(self.out, cursor::Hide, Print("\r\n")).map_err(terminal_error)?;
        self.flush()?;
        result
    }

    fn wait_for_enter(&mut self) -> UiResult<()> {
        loop {
            if self.read_key()?.code == KeyCode::Enter {
                return Ok(());
            }
        }
    }
}
