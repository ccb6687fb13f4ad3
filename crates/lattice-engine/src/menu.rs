//! Cursor-driven choice menus.
//!
//! A [`ChoiceMenu`] is a pure state machine: it holds the options and the
//! cursor, and the surface feeds it movement. Keeping it free of terminal
//! code lets scene branch logic be tested without a tty.

use crate::error::{EngineError, EngineResult};

/// Corruption level at or above which backends render the menu glitched.
/// Purely cosmetic; selection behavior never changes.
pub const GLITCH_THRESHOLD: i32 = 5;

/// A vertical list of options with a wrapping cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceMenu {
    options: Vec<String>,
    cursor: usize,
    corruption: i32,
}

impl ChoiceMenu {
    /// Build a menu over `options`, cursor on the first entry.
    /// `corruption` is carried along for cosmetic rendering only.
    pub fn new<I, S>(options: I, corruption: i32) -> EngineResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(EngineError::EmptyMenu);
        }
        Ok(Self {
            options,
            cursor: 0,
            corruption,
        })
    }

    /// The option labels.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Always `false`; a menu cannot be empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Move the cursor up, wrapping from the first option to the last.
    pub fn move_up(&mut self) {
        self.cursor = if self.cursor == 0 {
            self.options.len() - 1
        } else {
            self.cursor - 1
        };
    }

    /// Move the cursor down, wrapping from the last option to the first.
    pub fn move_down(&mut self) {
        self.cursor = (self.cursor + 1) % self.options.len();
    }

    /// The index a confirm would select right now.
    pub fn selected(&self) -> usize {
        self.cursor
    }

    /// Whether backends should render this menu with glitch artifacts.
    pub fn glitched(&self) -> bool {
        self.corruption >= GLITCH_THRESHOLD
    }
}
