//! Typed stat-mutating effects applied by scene content.
//!
//! Scenes express their branch outcomes as [`Effect`] values applied
//! through [`GameState::apply`](crate::GameState::apply), which keeps the
//! outcomes declarative and serializable. There is no string-encoded
//! variant: an effect that exists cannot be malformed.

use serde::{Deserialize, Serialize};

/// A single mutation of the player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", content = "value", rename_all = "snake_case")]
pub enum Effect {
    /// Adjust stability by a (possibly negative) delta, clamped to [0, 10].
    AdjustStability(i32),
    /// Adjust corruption by a (possibly negative) delta, clamped to [0, 10].
    AdjustCorruption(i32),
    /// Collect an identity fragment; a duplicate is a no-op.
    AddFragment(String),
    /// Shift an NPC's affinity; initializes the NPC at 0 if unseen.
    AdjustRelationship {
        /// NPC identifier.
        npc: String,
        /// Affinity delta, unbounded.
        delta: i32,
    },
}

impl Effect {
    /// Shorthand for a fragment effect from a string literal.
    pub fn fragment(id: impl Into<String>) -> Self {
        Effect::AddFragment(id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_shorthand() {
        assert_eq!(
            Effect::fragment("shard_001"),
            Effect::AddFragment("shard_001".to_string())
        );
    }

    #[test]
    fn serde_roundtrip() {
        let effects = vec![
            Effect::AdjustStability(2),
            Effect::AdjustCorruption(-1),
            Effect::fragment("AvaMemory"),
            Effect::AdjustRelationship {
                npc: "ava".to_string(),
                delta: 1,
            },
        ];
        let json = serde_json::to_string(&effects).unwrap();
        let back: Vec<Effect> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, effects);
    }
}
