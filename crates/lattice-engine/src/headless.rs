//! A scripted surface for tests.
//!
//! [`HeadlessSurface`] answers prompts from a fixed reply queue and
//! records everything printed, so scene branch logic and the director
//! loop can be exercised without a terminal. It never sleeps: pauses
//! and teletype delays are dropped, and a scripted puzzle answer is
//! judged at the instant the clock starts.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::menu::ChoiceMenu;
use crate::puzzle::TimedPuzzle;
use crate::surface::{Notice, Surface, TextStyle, UiError, UiResult};

/// One scripted player action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Pick the option at this index in the next menu or notice.
    Choice(usize),
    /// Type this text at the next free-text prompt or puzzle.
    Text(String),
    /// Press the interrupt key at the next blocking prompt.
    Interrupt,
}

/// Surface backend that plays back a reply script.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    replies: VecDeque<Reply>,
    transcript: Vec<String>,
}

impl HeadlessSurface {
    /// A surface with no scripted replies. Fine for scenes that never
    /// prompt; any prompt fails with [`UiError::Closed`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that will answer prompts from `replies` in order.
    pub fn with_replies<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Reply>,
    {
        Self {
            replies: replies.into_iter().collect(),
            transcript: Vec::new(),
        }
    }

    /// Queue one more reply.
    pub fn push_reply(&mut self, reply: Reply) {
        self.replies.push_back(reply);
    }

    /// Everything printed so far, one entry per line.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Whether any printed line contains `needle`.
    pub fn printed(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    fn next_reply(&mut self) -> UiResult<Reply> {
        self.replies.pop_front().ok_or(UiError::Closed)
    }
}

impl Surface for HeadlessSurface {
    fn line(&mut self, text: &str, _style: TextStyle) -> UiResult<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }

    fn type_out(&mut self, text: &str, _style: TextStyle) -> UiResult<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }

    fn pause(&mut self, _duration: Duration) -> UiResult<()> {
        Ok(())
    }

    fn clear(&mut self) -> UiResult<()> {
        Ok(())
    }

    fn choose(&mut self, prompt: Option<&str>, menu: &mut ChoiceMenu) -> UiResult<usize> {
        if let Some(prompt) = prompt {
            self.transcript.push(prompt.to_string());
        }
        for option in menu.options() {
            self.transcript.push(option.clone());
        }
        match self.next_reply()? {
            Reply::Choice(index) if index < menu.len() => {
                // Walk the cursor there so menu and result agree.
                while menu.selected() != index {
                    menu.move_down();
                }
                Ok(menu.selected())
            }
            Reply::Choice(index) => Err(UiError::Terminal(format!(
                "scripted choice {index} out of range for {} options",
                menu.len()
            ))),
            Reply::Interrupt => Err(UiError::Interrupted),
            Reply::Text(text) => Err(UiError::Terminal(format!(
                "scripted text {text:?} where a choice was expected"
            ))),
        }
    }

    fn run_puzzle(&mut self, puzzle: &mut TimedPuzzle) -> UiResult<bool> {
        self.transcript.push(puzzle.scrambled().to_string());
        let now = Instant::now();
        puzzle.begin(now);
        // No reply scripted means nobody typed: the deadline passes.
        let Some(reply) = self.replies.pop_front() else {
            return Ok(puzzle.poll(now + puzzle.time_limit()) == Some(true));
        };
        match reply {
            Reply::Text(text) => {
                for c in text.chars() {
                    puzzle.push_char(c);
                }
                match puzzle.poll(now) {
                    Some(outcome) => Ok(outcome),
                    // Wrong answer and no further typing: a timeout.
                    None => Ok(false),
                }
            }
            Reply::Interrupt => Err(UiError::Interrupted),
            Reply::Choice(index) => Err(UiError::Terminal(format!(
                "scripted choice {index} where puzzle input was expected"
            ))),
        }
    }

    fn message_box(&mut self, notice: &Notice) -> UiResult<Option<usize>> {
        self.transcript.push(notice.title.clone());
        for line in &notice.lines {
            self.transcript.push(line.text.clone());
        }
        if notice.choices.is_empty() {
            return Ok(None);
        }
        for choice in &notice.choices {
            self.transcript.push(choice.clone());
        }
        match self.next_reply()? {
            Reply::Choice(index) if index < notice.choices.len() => Ok(Some(index)),
            Reply::Choice(index) => Err(UiError::Terminal(format!(
                "scripted choice {index} out of range for {} notice choices",
                notice.choices.len()
            ))),
            Reply::Interrupt => Err(UiError::Interrupted),
            Reply::Text(text) => Err(UiError::Terminal(format!(
                "scripted text {text:?} where a notice choice was expected"
            ))),
        }
    }

    fn read_line(&mut self, prompt: &str) -> UiResult<String> {
        self.transcript.push(prompt.to_string());
        match self.next_reply()? {
            Reply::Text(text) => Ok(text),
            Reply::Interrupt => Err(UiError::Interrupted),
            Reply::Choice(index) => Err(UiError::Terminal(format!(
                "scripted choice {index} where text was expected"
            ))),
        }
    }

    fn wait_for_enter(&mut self) -> UiResult<()> {
        // Only an interrupt script entry is consumed here; anything else
        // stays queued for the next real prompt.
        if self.replies.front() == Some(&Reply::Interrupt) {
            self.replies.pop_front();
            return Err(UiError::Interrupted);
        }
        Ok(())
    }
}
