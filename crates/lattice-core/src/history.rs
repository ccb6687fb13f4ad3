//! Append-only audit log of state changes.
//!
//! History entries exist for debugging and post-session inspection. They are
//! never replayed: restoring a save reconstructs state from the snapshot
//! fields, not from this log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which bounded stat a change refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    /// The identity-tether stat, in [0, 10].
    Stability,
    /// The decay stat, in [0, 10].
    Corruption,
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stat::Stability => write!(f, "stability"),
            Stat::Corruption => write!(f, "corruption"),
        }
    }
}

/// A single recorded state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEvent {
    /// A bounded stat moved, possibly saturating at a bound.
    StatChange {
        /// Which stat changed.
        stat: Stat,
        /// The requested delta (before clamping).
        delta: i32,
        /// Value before the change.
        old: i32,
        /// Value after the change.
        new: i32,
        /// When the change was applied.
        timestamp: DateTime<Utc>,
    },
    /// An identity fragment was collected for the first time.
    FragmentGained {
        /// The fragment id.
        id: String,
        /// When the fragment was gained.
        timestamp: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_display() {
        assert_eq!(Stat::Stability.to_string(), "stability");
        assert_eq!(Stat::Corruption.to_string(), "corruption");
    }

    #[test]
    fn serde_tagging() {
        let event = HistoryEvent::FragmentGained {
            id: "shard_001".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"fragment_gained\""));
        assert!(json.contains("shard_001"));
    }
}
