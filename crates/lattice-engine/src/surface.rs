//! The presentation seam.
//!
//! Scenes and the director talk to the player exclusively through the
//! [`Surface`] trait. The terminal implementation lives in the binary
//! crate; tests drive the same scenes through
//! [`HeadlessSurface`](crate::headless::HeadlessSurface).

use std::time::Duration;

use thiserror::Error;

use crate::menu::ChoiceMenu;
use crate::puzzle::TimedPuzzle;

/// Result alias for presentation calls.
pub type UiResult<T> = Result<T, UiError>;

/// Failures surfaced by a presentation backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    /// The player pressed the interrupt key (Ctrl-C or Esc at a blocking
    /// prompt). The director turns this into a disconnect confirmation.
    #[error("interrupted by player")]
    Interrupted,

    /// The input stream ended with a prompt still waiting. Raised by the
    /// headless backend when its scripted replies run out.
    #[error("input closed")]
    Closed,

    /// A terminal-level failure (lost tty, write error).
    #[error("terminal failure: {0}")]
    Terminal(String),
}

/// How a piece of text should be rendered.
///
/// Styles are semantic; each backend maps them to colors and attributes
/// however it likes. The headless backend ignores them entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    /// Unadorned body text.
    #[default]
    Plain,
    /// Descriptive narration, rendered dimmed.
    Narration,
    /// Diegetic system output from the Lattice itself.
    System,
    /// A caution line.
    Warning,
    /// An urgent failure line.
    Alert,
    /// Spoken NPC dialogue.
    Dialogue,
    /// Half-heard voices; backends may glitch these.
    Whisper,
    /// A positive confirmation line.
    Success,
}

/// How a choiceless [`Notice`] is dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// Wait for any key.
    Key,
    /// Hold for a fixed duration, then dismiss.
    Duration(Duration),
}

/// One styled line inside a [`Notice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeLine {
    /// The text, empty for a spacer line.
    pub text: String,
    /// How to render it.
    pub style: TextStyle,
}

/// A bordered modal message: a title, body lines, and optionally a short
/// horizontal choice row. Built with the chained constructors below.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Title shown in the top border.
    pub title: String,
    /// Body lines, top to bottom.
    pub lines: Vec<NoticeLine>,
    /// Choice labels; empty for a plain notice.
    pub choices: Vec<String>,
    /// Dismissal behavior when there are no choices.
    pub hold: Hold,
}

impl Notice {
    /// Start a notice with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            choices: Vec::new(),
            hold: Hold::Key,
        }
    }

    /// Append a styled body line.
    pub fn line(mut self, text: impl Into<String>, style: TextStyle) -> Self {
        self.lines.push(NoticeLine {
            text: text.into(),
            style,
        });
        self
    }

    /// Append an empty spacer line.
    pub fn blank(self) -> Self {
        self.line("", TextStyle::Plain)
    }

    /// Attach a horizontal choice row. The surface returns the picked index.
    pub fn choices<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Dismiss automatically after `duration` instead of waiting for a key.
    pub fn hold_for(mut self, duration: Duration) -> Self {
        self.hold = Hold::Duration(duration);
        self
    }
}

/// Everything a backend must provide to host a session.
pub trait Surface {
    /// Print a full line immediately.
    fn line(&mut self, text: &str, style: TextStyle) -> UiResult<()>;

    /// Print a line with the teletype effect. Backends may let a keypress
    /// skip the remaining delay; the full text always ends up on screen.
    fn type_out(&mut self, text: &str, style: TextStyle) -> UiResult<()>;

    /// Dramatic pause between beats. Backends may shorten or skip it.
    fn pause(&mut self, duration: Duration) -> UiResult<()>;

    /// Clear the display.
    fn clear(&mut self) -> UiResult<()>;

    /// Run an interactive selection over `menu` and return the picked
    /// option index. The menu owns cursor movement and wrapping; the
    /// backend renders and feeds it key events.
    fn choose(&mut self, prompt: Option<&str>, menu: &mut ChoiceMenu) -> UiResult<usize>;

    /// Drive a timed puzzle to completion. Returns `true` on a solve,
    /// `false` on timeout.
    fn run_puzzle(&mut self, puzzle: &mut TimedPuzzle) -> UiResult<bool>;

    /// Show a modal notice. Returns the picked choice index, or `None`
    /// for a notice without choices.
    fn message_box(&mut self, notice: &Notice) -> UiResult<Option<usize>>;

    /// Read a free-text line from the player.
    fn read_line(&mut self, prompt: &str) -> UiResult<String>;

    /// Block until the player presses Enter.
    fn wait_for_enter(&mut self) -> UiResult<()>;
}
