//! Ending classification derived from the bounded stats.

use serde::{Deserialize, Serialize};

/// The narrative ending a playthrough is currently heading toward.
///
/// Derived from `corruption_level` and `stability`, never stored. The
/// check order is part of the contract: collapse (the worst outcome) takes
/// priority, then restoration, then integration. The current [0, 10] ranges
/// make the conditions mutually exclusive, but the priority order must hold
/// if the thresholds ever move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ending {
    /// Corruption reached 8 or more: the Lattice wins.
    Collapse,
    /// Stability reached 8 or more: the caretaker holds.
    Restoration,
    /// Both stats in the middle band [3, 6): an uneasy merge.
    Integration,
    /// No threshold met yet.
    Undetermined,
}

impl Ending {
    /// Classify an ending from the two bounded stats.
    pub fn classify(corruption: i32, stability: i32) -> Ending {
        if corruption >= 8 {
            Ending::Collapse
        } else if stability >= 8 {
            Ending::Restoration
        } else if (3..6).contains(&corruption) && (3..6).contains(&stability) {
            Ending::Integration
        } else {
            Ending::Undetermined
        }
    }
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Ending::Collapse => "collapse",
            Ending::Restoration => "restoration",
            Ending::Integration => "integration",
            Ending::Undetermined => "undetermined",
        };
        write!(f, "{name}")
    }
}
