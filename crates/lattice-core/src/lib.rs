//! Core player-state model for Fragments of the Lattice.
//!
//! This crate defines the mutable progress record that the scene engine
//! threads through a playthrough: the two opposing bounded stats, collected
//! identity fragments, NPC affinities, and the audit history of every change.
//! It is independent of any terminal or persistence concern; the engine
//! crate snapshots it to disk and the presentation crate renders it.

/// Typed stat-mutating effects applied by scene content.
pub mod effect;
/// Ending classification derived from the bounded stats.
pub mod ending;
/// Append-only audit log of state changes.
pub mod history;
/// The mutable player progress record.
pub mod state;

/// Re-export effect types.
pub use effect::Effect;
/// Re-export ending types.
pub use ending::Ending;
/// Re-export history types.
pub use history::{HistoryEvent, Stat};
/// Re-export state types.
pub use state::{GameState, NODE_COMPLETE, STAT_MAX, Snapshot};
