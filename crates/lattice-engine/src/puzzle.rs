//! Timed word-stabilization puzzles.
//!
//! A [`TimedPuzzle`] shows the player a scrambled word; they must type the
//! clean target before the deadline. Like [`ChoiceMenu`](crate::ChoiceMenu)
//! it is a pure state machine driven by the surface: the backend feeds it
//! keystrokes and polls it against a clock it supplies, so outcomes are
//! fully testable with synthetic [`Instant`]s.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::hash::fnv1a64;

/// Glyphs injected by the heavy-corruption layer.
const CORRUPTION_SYMBOLS: [&str; 11] = [
    "@", "#", "$", "%", "&", "!", "?", "▓", "▒", "░", "×",
];

/// A type-the-word challenge with a deadline.
#[derive(Debug, Clone)]
pub struct TimedPuzzle {
    target: String,
    scrambled: String,
    difficulty: u8,
    time_limit: Duration,
    input: String,
    deadline: Option<Instant>,
}

impl TimedPuzzle {
    /// Build a puzzle for `target` at the given difficulty.
    ///
    /// The deadline is `base_limit` plus a stability bonus of one second
    /// per four points (+2s at stability 8). The scramble is a pure
    /// function of the target and difficulty, so the same puzzle always
    /// shows the same corrupted word.
    pub fn new(target: &str, difficulty: u8, base_limit: Duration, stability: i32) -> Self {
        let target = target.to_uppercase();
        let bonus = Duration::from_secs(u64::from(stability.max(0) as u32 / 4));
        let scrambled = scramble(&target, difficulty);
        Self {
            target,
            scrambled,
            difficulty,
            time_limit: base_limit + bonus,
            input: String::new(),
            deadline: None,
        }
    }

    /// The clean word the player must type.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The corrupted word shown on screen.
    pub fn scrambled(&self) -> &str {
        &self.scrambled
    }

    /// Difficulty as constructed.
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// The full time allowance, stability bonus included.
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// The player's input so far.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Start the clock. The deadline is fixed from `now`; polls compare
    /// against it.
    pub fn begin(&mut self, now: Instant) {
        self.deadline = Some(now + self.time_limit);
    }

    /// Time left on the clock, zero once the deadline has passed or if
    /// the puzzle has not begun.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    /// Append a typed character.
    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Remove the last typed character, if any.
    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Check for an outcome. The deadline is checked first: input that
    /// matches exactly at the deadline still fails. Matching is
    /// case-insensitive. Returns `None` while the puzzle is undecided
    /// or has not begun.
    pub fn poll(&self, now: Instant) -> Option<bool> {
        let deadline = self.deadline?;
        if now >= deadline {
            return Some(false);
        }
        if self.input.eq_ignore_ascii_case(&self.target) {
            return Some(true);
        }
        None
    }
}

/// Corrupt `target` deterministically for the given difficulty.
///
/// Three layers run in order over a cell-per-character buffer (cells,
/// because a substitution may expand one character into two glyphs):
/// substitution, positional swaps, then symbol injection. The randomness
/// is seeded from the target and difficulty so the scramble is stable.
fn scramble(target: &str, difficulty: u8) -> String {
    let mut cells: Vec<String> = target.chars().map(String::from).collect();
    if cells.is_empty() {
        return String::new();
    }
    let mut rng = StdRng::seed_from_u64(scramble_seed(target, difficulty));
    substitute_layer(&mut cells, &mut rng, difficulty);
    swap_layer(&mut cells, &mut rng, difficulty);
    symbol_layer(&mut cells, &mut rng, difficulty);
    cells.concat()
}

fn scramble_seed(target: &str, difficulty: u8) -> u64 {
    let mut keyed = target.as_bytes().to_vec();
    keyed.push(difficulty);
    fnv1a64(&keyed)
}

/// Layer 1: glyph substitution. Active at every difficulty; per-cell
/// probability is `0.2 * difficulty`, capped at 1.0.
fn substitute_layer(cells: &mut [String], rng: &mut StdRng, difficulty: u8) {
    let prob = (0.2 * f64::from(difficulty)).min(1.0);
    for cell in cells.iter_mut() {
        let Some(c) = cell.chars().next() else {
            continue;
        };
        if let Some(glyph) = substitute_glyph(c) {
            if rng.random::<f64>() < prob {
                *cell = glyph.to_string();
            }
        }
    }
}

/// Layer 2: positional swaps. Inactive at difficulty 1; above that,
/// `difficulty - 1` swaps of two distinct cells.
fn swap_layer(cells: &mut [String], rng: &mut StdRng, difficulty: u8) {
    let num_swaps = usize::from(difficulty.saturating_sub(1));
    if cells.len() < 2 {
        return;
    }
    for _ in 0..num_swaps {
        let a = rng.random_range(0..cells.len());
        let mut b = rng.random_range(0..cells.len() - 1);
        if b >= a {
            b += 1;
        }
        cells.swap(a, b);
    }
}

/// Layer 3: heavy symbol corruption. Only at difficulty 3 and above;
/// per-cell probability is `0.1 * (difficulty - 2)`, capped at 0.5.
fn symbol_layer(cells: &mut [String], rng: &mut StdRng, difficulty: u8) {
    if difficulty < 3 {
        return;
    }
    let prob = (0.1 * f64::from(difficulty - 2)).min(0.5);
    for cell in cells.iter_mut() {
        if rng.random::<f64>() < prob {
            let symbol = CORRUPTION_SYMBOLS
                .choose(rng)
                .copied()
                .unwrap_or("▓");
            *cell = symbol.to_string();
        }
    }
}

/// The corrupted-glyph alphabet for the substitution layer. Targets are
/// uppercased before scrambling, so only uppercase letters map.
fn substitute_glyph(c: char) -> Option<&'static str> {
    let glyph = match c {
        'A' => "Λ",
        'B' => "8",
        'C' => "©",
        'D' => "Ð",
        'E' => "3",
        'F' => "ƒ",
        'G' => "9",
        'H' => "#",
        'I' => "!",
        'J' => "]",
        'K' => "×",
        'L' => "|",
        'M' => "^^",
        'N' => "Ñ",
        'O' => "0",
        'P' => "¶",
        'Q' => "9",
        'R' => "®",
        'S' => "$",
        'T' => "+",
        'U' => "µ",
        'V' => "√",
        'W' => "WW",
        'X' => "×",
        'Y' => "¥",
        'Z' => "2",
        _ => return None,
    };
    Some(glyph)
}
