//! The mutable player progress record.
//!
//! A single [`GameState`] is owned by the progression loop and passed by
//! mutable reference into each scene. Scenes mutate it only through the
//! typed operations here; every stat change is clamped and recorded in the
//! audit history.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::effect::Effect;
use crate::ending::Ending;
use crate::history::{HistoryEvent, Stat};

/// Lower bound for both stats.
pub const STAT_MIN: i32 = 0;
/// Upper bound for both stats.
pub const STAT_MAX: i32 = 10;

/// Sentinel node id meaning the playthrough reached the end of content.
pub const NODE_COMPLETE: &str = "complete";

/// The player's progress through the Lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    player_name: String,
    identity_fragments: Vec<String>,
    corruption_level: i32,
    stability: i32,
    npc_relationships: BTreeMap<String, i32>,
    current_node_id: String,
    history: Vec<HistoryEvent>,
    puzzles_solved: u32,
    puzzles_failed: u32,
    nodes_visited: u32,
    playtime_seconds: f64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            player_name: "Caretaker".to_string(),
            identity_fragments: Vec::new(),
            corruption_level: 0,
            stability: 3,
            npc_relationships: BTreeMap::new(),
            current_node_id: "intro".to_string(),
            history: Vec::new(),
            puzzles_solved: 0,
            puzzles_failed: 0,
            nodes_visited: 0,
            playtime_seconds: 0.0,
        }
    }
}

impl GameState {
    /// Create a fresh state for a new playthrough.
    pub fn new() -> Self {
        Self::default()
    }

    /// The player's chosen name.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Set the player name during onboarding. Later calls are ignored:
    /// identity, once registered, does not change.
    pub fn register_name(&mut self, name: impl Into<String>) {
        if self.player_name == "Caretaker" {
            let name = name.into();
            if !name.is_empty() {
                self.player_name = name;
            }
        }
    }

    /// Current corruption level, always in [0, 10].
    pub fn corruption_level(&self) -> i32 {
        self.corruption_level
    }

    /// Current stability, always in [0, 10].
    pub fn stability(&self) -> i32 {
        self.stability
    }

    /// Collected fragment ids in the order they were gained.
    pub fn identity_fragments(&self) -> &[String] {
        &self.identity_fragments
    }

    /// NPC affinities keyed by NPC id.
    pub fn npc_relationships(&self) -> &BTreeMap<String, i32> {
        &self.npc_relationships
    }

    /// The id of the scene the player is in (or [`NODE_COMPLETE`]).
    pub fn current_node_id(&self) -> &str {
        &self.current_node_id
    }

    /// Point the state at a scene id. Called by the progression loop at
    /// each scene boundary so a save taken there resumes correctly.
    pub fn set_current_node(&mut self, id: impl Into<String>) {
        self.current_node_id = id.into();
    }

    /// The audit log of every recorded change.
    pub fn history(&self) -> &[HistoryEvent] {
        &self.history
    }

    /// Number of timed puzzles solved.
    pub fn puzzles_solved(&self) -> u32 {
        self.puzzles_solved
    }

    /// Number of timed puzzles failed.
    pub fn puzzles_failed(&self) -> u32 {
        self.puzzles_failed
    }

    /// Number of scene entries across the playthrough.
    pub fn nodes_visited(&self) -> u32 {
        self.nodes_visited
    }

    /// Accumulated play time in seconds.
    pub fn playtime_seconds(&self) -> f64 {
        self.playtime_seconds
    }

    /// Adjust stability by `delta`, saturating at the [0, 10] bounds.
    /// Always succeeds; the attempt is recorded in history.
    pub fn apply_stability(&mut self, delta: i32) {
        let old = self.stability;
        self.stability = self.stability.saturating_add(delta).clamp(STAT_MIN, STAT_MAX);
        self.history.push(HistoryEvent::StatChange {
            stat: Stat::Stability,
            delta,
            old,
            new: self.stability,
            timestamp: Utc::now(),
        });
    }

    /// Adjust corruption by `delta`, saturating at the [0, 10] bounds.
    /// Always succeeds; the attempt is recorded in history.
    pub fn apply_corruption(&mut self, delta: i32) {
        let old = self.corruption_level;
        self.corruption_level = self
            .corruption_level
            .saturating_add(delta)
            .clamp(STAT_MIN, STAT_MAX);
        self.history.push(HistoryEvent::StatChange {
            stat: Stat::Corruption,
            delta,
            old,
            new: self.corruption_level,
            timestamp: Utc::now(),
        });
    }

    /// Collect an identity fragment. Returns `true` if it was newly added,
    /// `false` if the id was already held (the duplicate is a no-op).
    pub fn add_fragment(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.identity_fragments.contains(&id) {
            return false;
        }
        self.history.push(HistoryEvent::FragmentGained {
            id: id.clone(),
            timestamp: Utc::now(),
        });
        self.identity_fragments.push(id);
        true
    }

    /// Shift an NPC's affinity by `delta`, initializing it at 0 for an
    /// NPC seen for the first time. Affinity is unbounded.
    pub fn relationship_delta(&mut self, npc: impl Into<String>, delta: i32) {
        let affinity = self.npc_relationships.entry(npc.into()).or_insert(0);
        *affinity = affinity.saturating_add(delta);
    }

    /// Apply a typed effect by dispatching to the operation it names.
    pub fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::AdjustStability(delta) => self.apply_stability(*delta),
            Effect::AdjustCorruption(delta) => self.apply_corruption(*delta),
            Effect::AddFragment(id) => {
                self.add_fragment(id.clone());
            }
            Effect::AdjustRelationship { npc, delta } => {
                self.relationship_delta(npc.clone(), *delta);
            }
        }
    }

    /// Record a solved puzzle.
    pub fn record_puzzle_solved(&mut self) {
        self.puzzles_solved += 1;
    }

    /// Record a failed puzzle.
    pub fn record_puzzle_failed(&mut self) {
        self.puzzles_failed += 1;
    }

    /// Record a scene entry.
    pub fn record_node_visit(&mut self) {
        self.nodes_visited += 1;
    }

    /// Add elapsed play time.
    pub fn add_playtime(&mut self, seconds: f64) {
        self.playtime_seconds += seconds;
    }

    /// Classify the ending the playthrough is heading toward.
    pub fn ending(&self) -> Ending {
        Ending::classify(self.corruption_level, self.stability)
    }

    /// Capture a serializable snapshot of every field.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player_name: self.player_name.clone(),
            identity_fragments: self.identity_fragments.clone(),
            corruption_level: self.corruption_level,
            stability: self.stability,
            npc_relationships: self.npc_relationships.clone(),
            current_node_id: self.current_node_id.clone(),
            history: self.history.clone(),
            puzzles_solved: self.puzzles_solved,
            puzzles_failed: self.puzzles_failed,
            nodes_visited: self.nodes_visited,
            playtime_seconds: self.playtime_seconds,
        }
    }

    /// Reconstruct a state from a snapshot. Stats are re-clamped so a
    /// hand-edited save cannot smuggle an out-of-range value in.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            player_name: snapshot.player_name,
            identity_fragments: snapshot.identity_fragments,
            corruption_level: snapshot.corruption_level.clamp(STAT_MIN, STAT_MAX),
            stability: snapshot.stability.clamp(STAT_MIN, STAT_MAX),
            npc_relationships: snapshot.npc_relationships,
            current_node_id: snapshot.current_node_id,
            history: snapshot.history,
            puzzles_solved: snapshot.puzzles_solved,
            puzzles_failed: snapshot.puzzles_failed,
            nodes_visited: snapshot.nodes_visited,
            playtime_seconds: snapshot.playtime_seconds,
        }
    }
}

/// A plain serializable image of a [`GameState`].
///
/// `history` defaults to empty on deserialization: older saves without it
/// still restore, per the persistence contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The player's chosen name.
    pub player_name: String,
    /// Collected fragment ids in insertion order.
    pub identity_fragments: Vec<String>,
    /// Corruption level at capture time.
    pub corruption_level: i32,
    /// Stability at capture time.
    pub stability: i32,
    /// NPC affinities.
    pub npc_relationships: BTreeMap<String, i32>,
    /// The scene id the state was captured at.
    pub current_node_id: String,
    /// Audit history; may be absent in a save.
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
    /// Puzzles solved.
    pub puzzles_solved: u32,
    /// Puzzles failed.
    pub puzzles_failed: u32,
    /// Scene entries.
    pub nodes_visited: u32,
    /// Accumulated play time in seconds.
    pub playtime_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_state_defaults() {
        let state = GameState::new();
        assert_eq!(state.player_name(), "Caretaker");
        assert_eq!(state.corruption_level(), 0);
        assert_eq!(state.stability(), 3);
        assert!(state.identity_fragments().is_empty());
        assert_eq!(state.ending(), Ending::Undetermined);
    }

    #[test]
    fn stability_clamps_at_bounds() {
        let mut state = GameState::new();
        state.apply_stability(100);
        assert_eq!(state.stability(), STAT_MAX);
        state.apply_stability(-100);
        assert_eq!(state.stability(), STAT_MIN);
    }

    #[test]
    fn corruption_clamps_at_bounds() {
        let mut state = GameState::new();
        state.apply_corruption(-5);
        assert_eq!(state.corruption_level(), STAT_MIN);
        state.apply_corruption(99);
        assert_eq!(state.corruption_level(), STAT_MAX);
    }

    #[test]
    fn stat_change_records_old_and_new() {
        let mut state = GameState::new();
        state.apply_stability(2);
        let Some(HistoryEvent::StatChange {
            stat,
            delta,
            old,
            new,
            ..
        }) = state.history().last()
        else {
            panic!("expected a stat change entry");
        };
        assert_eq!(*stat, Stat::Stability);
        assert_eq!(*delta, 2);
        assert_eq!(*old, 3);
        assert_eq!(*new, 5);
    }

    #[test]
    fn saturating_change_records_requested_delta() {
        let mut state = GameState::new();
        state.apply_corruption(50);
        let Some(HistoryEvent::StatChange { delta, old, new, .. }) = state.history().last()
        else {
            panic!("expected a stat change entry");
        };
        assert_eq!(*delta, 50);
        assert_eq!(*old, 0);
        assert_eq!(*new, 10);
    }

    #[test]
    fn add_fragment_is_idempotent() {
        let mut state = GameState::new();
        assert!(state.add_fragment("shard_001"));
        assert!(!state.add_fragment("shard_001"));
        assert_eq!(state.identity_fragments().len(), 1);
    }

    #[test]
    fn fragments_keep_insertion_order() {
        let mut state = GameState::new();
        state.add_fragment("b");
        state.add_fragment("a");
        state.add_fragment("b");
        assert_eq!(state.identity_fragments(), ["b", "a"]);
    }

    #[test]
    fn relationship_initializes_lazily() {
        let mut state = GameState::new();
        state.relationship_delta("ava", 2);
        state.relationship_delta("ava", -5);
        assert_eq!(state.npc_relationships()["ava"], -3);
    }

    #[test]
    fn apply_dispatches_all_variants() {
        let mut state = GameState::new();
        state.apply(&Effect::AdjustStability(2));
        state.apply(&Effect::AdjustCorruption(4));
        state.apply(&Effect::fragment("AvaMemory"));
        state.apply(&Effect::AdjustRelationship {
            npc: "ava".to_string(),
            delta: 1,
        });
        assert_eq!(state.stability(), 5);
        assert_eq!(state.corruption_level(), 4);
        assert_eq!(state.identity_fragments(), ["AvaMemory"]);
        assert_eq!(state.npc_relationships()["ava"], 1);
    }

    #[test]
    fn register_name_is_write_once() {
        let mut state = GameState::new();
        state.register_name("Mira");
        state.register_name("Someone Else");
        assert_eq!(state.player_name(), "Mira");
    }

    #[test]
    fn register_empty_name_keeps_default() {
        let mut state = GameState::new();
        state.register_name("");
        assert_eq!(state.player_name(), "Caretaker");
    }

    #[test]
    fn snapshot_roundtrip_preserves_all_fields() {
        let mut state = GameState::new();
        state.register_name("Mira");
        state.apply_stability(3);
        state.apply_corruption(2);
        state.add_fragment("shard_001");
        state.relationship_delta("ava", 1);
        state.set_current_node("node0x2_ava_intro");
        state.record_puzzle_solved();

        let restored = GameState::from_snapshot(state.snapshot());
        assert_eq!(restored, state);
    }

    #[test]
    fn snapshot_survives_json() {
        let mut state = GameState::new();
        state.apply_corruption(7);
        state.add_fragment("shard_001");

        let json = serde_json::to_string(&state.snapshot()).unwrap();
        let snapshot: Snapshot = serde_json::from_str(&json).unwrap();
        let restored = GameState::from_snapshot(snapshot);
        assert_eq!(restored.corruption_level(), 7);
        assert_eq!(restored.identity_fragments(), ["shard_001"]);
    }

    #[test]
    fn snapshot_without_history_still_restores() {
        let mut state = GameState::new();
        state.apply_stability(1);
        let mut json: serde_json::Value =
            serde_json::to_value(state.snapshot()).unwrap();
        json.as_object_mut().unwrap().remove("history");

        let snapshot: Snapshot = serde_json::from_value(json).unwrap();
        let restored = GameState::from_snapshot(snapshot);
        assert_eq!(restored.stability(), 4);
        assert!(restored.history().is_empty());
    }

    #[test]
    fn from_snapshot_reclamps_stats() {
        let mut snapshot = GameState::new().snapshot();
        snapshot.corruption_level = 99;
        snapshot.stability = -4;
        let restored = GameState::from_snapshot(snapshot);
        assert_eq!(restored.corruption_level(), 10);
        assert_eq!(restored.stability(), 0);
    }

    proptest! {
        #[test]
        fn stats_stay_in_bounds_under_any_deltas(
            deltas in proptest::collection::vec(any::<i32>(), 0..64)
        ) {
            let mut state = GameState::new();
            for (i, delta) in deltas.iter().enumerate() {
                if i % 2 == 0 {
                    state.apply_stability(*delta);
                } else {
                    state.apply_corruption(*delta);
                }
                prop_assert!((STAT_MIN..=STAT_MAX).contains(&state.stability()));
                prop_assert!(
                    (STAT_MIN..=STAT_MAX).contains(&state.corruption_level())
                );
            }
        }

        #[test]
        fn history_grows_by_one_per_stat_change(
            deltas in proptest::collection::vec(-20i32..20, 1..32)
        ) {
            let mut state = GameState::new();
            for delta in &deltas {
                state.apply_stability(*delta);
            }
            prop_assert_eq!(state.history().len(), deltas.len());
        }
    }
}
