//! Save slots on disk.
//!
//! One JSON file per slot under the configured save directory. A record
//! carries a format version and a checksum over the serialized state;
//! on load, any problem at all (absent file, bad JSON, version mismatch,
//! checksum mismatch) collapses to "no usable save" rather than an error
//! the caller must triage. The failure reason goes to the log.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lattice_core::{GameState, Snapshot};

use crate::hash::fnv1a64;

/// Current save format version. Loads require an exact match; there is
/// no migration path between versions.
pub const SAVE_VERSION: &str = "1.1.0";

/// Errors from writing a save. Loads never return these.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Filesystem failure.
    #[error("save io error: {0}")]
    Io(#[from] io::Error),
    /// Serialization failure.
    #[error("save encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The on-disk shape of one save slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Format version; must equal [`SAVE_VERSION`] to load.
    pub version: String,
    /// When the save was written.
    pub timestamp: DateTime<Utc>,
    /// The scene boundary the save was taken at.
    pub scene_id: String,
    /// The full state snapshot.
    pub state: Snapshot,
    /// FNV-1a 64 digest of the serialized `state`, as lowercase hex.
    pub checksum: String,
}

/// Reads and writes save slots under one directory.
#[derive(Debug, Clone)]
pub struct SaveManager {
    dir: PathBuf,
}

impl SaveManager {
    /// Manage slots under `dir`. The directory is created lazily on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file path backing `slot`.
    pub fn slot_path(&self, slot: u32) -> PathBuf {
        self.dir.join(format!("slot_{slot}.json"))
    }

    /// Whether `slot` has a file on disk. Says nothing about whether the
    /// file would pass validation.
    pub fn has_save(&self, slot: u32) -> bool {
        self.slot_path(slot).exists()
    }

    /// Write `state` to `slot`, stamped with `scene_id` as the resume
    /// point.
    pub fn save_game(
        &self,
        state: &GameState,
        scene_id: &str,
        slot: u32,
    ) -> Result<(), SaveError> {
        std::fs::create_dir_all(&self.dir)?;
        let snapshot = state.snapshot();
        let checksum = state_checksum(&snapshot)?;
        let record = SaveRecord {
            version: SAVE_VERSION.to_string(),
            timestamp: Utc::now(),
            scene_id: scene_id.to_string(),
            state: snapshot,
            checksum,
        };
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(self.slot_path(slot), json)?;
        log::info!("saved slot {slot} at {scene_id}");
        Ok(())
    }

    /// Load `slot`, or `None` if no valid save is there. Every failure
    /// mode is logged and then treated as an absent save.
    pub fn load_game(&self, slot: u32) -> Option<SaveRecord> {
        let path = self.slot_path(slot);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                log::warn!("cannot read {}: {err}", path.display());
                return None;
            }
        };
        let record: SaveRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(err) => {
                log::warn!("corrupt save {}: {err}", path.display());
                return None;
            }
        };
        if record.version != SAVE_VERSION {
            log::warn!(
                "save {} has version {}, expected {SAVE_VERSION}",
                path.display(),
                record.version
            );
            return None;
        }
        match state_checksum(&record.state) {
            Ok(expected) if expected == record.checksum => Some(record),
            Ok(_) => {
                log::warn!("checksum mismatch in {}", path.display());
                None
            }
            Err(err) => {
                log::warn!("cannot verify {}: {err}", path.display());
                None
            }
        }
    }

    /// Remove the file behind `slot`. Deleting an absent slot is a no-op.
    pub fn delete_save(&self, slot: u32) {
        let path = self.slot_path(slot);
        match std::fs::remove_file(&path) {
            Ok(()) => log::info!("deleted save slot {slot}"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => log::warn!("cannot delete {}: {err}", path.display()),
        }
    }
}

/// Checksum over the canonical JSON serialization of a snapshot. Field
/// order is fixed by the struct and map keys are sorted, so the digest
/// is stable for equal states.
fn state_checksum(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_string(snapshot)?;
    Ok(format!("{:016x}", fnv1a64(canonical.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, SaveManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path());
        (dir, manager)
    }

    fn sample_state() -> GameState {
        let mut state = GameState::new();
        state.register_name("Mira");
        state.apply_stability(2);
        state.apply_corruption(1);
        state.add_fragment("shard_001");
        state.set_current_node("node0x2_ava_intro");
        state
    }

    #[test]
    fn roundtrip_restores_state_and_scene() {
        let (_dir, saves) = manager();
        let state = sample_state();
        saves.save_game(&state, "node0x2_ava_intro", 1).unwrap();

        let record = saves.load_game(1).expect("save should load");
        assert_eq!(record.version, SAVE_VERSION);
        assert_eq!(record.scene_id, "node0x2_ava_intro");
        let restored = GameState::from_snapshot(record.state);
        assert_eq!(restored, state);
    }

    #[test]
    fn slots_are_independent() {
        let (_dir, saves) = manager();
        let state = sample_state();
        saves.save_game(&state, "node0x0_reboot", 1).unwrap();
        saves.save_game(&state, "node0x2_ava_intro", 2).unwrap();

        assert_eq!(saves.load_game(1).unwrap().scene_id, "node0x0_reboot");
        assert_eq!(saves.load_game(2).unwrap().scene_id, "node0x2_ava_intro");
    }

    #[test]
    fn absent_slot_loads_as_none() {
        let (_dir, saves) = manager();
        assert!(saves.load_game(1).is_none());
        assert!(!saves.has_save(1));
    }

    #[test]
    fn unparseable_file_loads_as_none() {
        let (_dir, saves) = manager();
        std::fs::create_dir_all(saves.slot_path(1).parent().unwrap()).unwrap();
        std::fs::write(saves.slot_path(1), "{ definitely not a save").unwrap();
        assert!(saves.load_game(1).is_none());
    }

    #[test]
    fn version_mismatch_loads_as_none() {
        let (_dir, saves) = manager();
        saves.save_game(&sample_state(), "node0x0_reboot", 1).unwrap();

        let raw = std::fs::read_to_string(saves.slot_path(1)).unwrap();
        let tampered = raw.replace(SAVE_VERSION, "0.9.0");
        std::fs::write(saves.slot_path(1), tampered).unwrap();

        assert!(saves.load_game(1).is_none());
    }

    #[test]
    fn tampered_state_fails_the_checksum() {
        let (_dir, saves) = manager();
        saves.save_game(&sample_state(), "node0x0_reboot", 1).unwrap();

        let raw = std::fs::read_to_string(saves.slot_path(1)).unwrap();
        let mut record: serde_json::Value = serde_json::from_str(&raw).unwrap();
        record["state"]["stability"] = serde_json::json!(10);
        std::fs::write(
            saves.slot_path(1),
            serde_json::to_string(&record).unwrap(),
        )
        .unwrap();

        assert!(saves.load_game(1).is_none());
    }

    #[test]
    fn save_overwrites_previous_slot_contents() {
        let (_dir, saves) = manager();
        let mut state = sample_state();
        saves.save_game(&state, "node0x0_reboot", 1).unwrap();
        state.apply_corruption(5);
        saves.save_game(&state, "node0x2_ava_intro", 1).unwrap();

        let record = saves.load_game(1).unwrap();
        assert_eq!(record.scene_id, "node0x2_ava_intro");
        assert_eq!(record.state.corruption_level, 6);
    }

    #[test]
    fn delete_is_idempotent() {
        let (_dir, saves) = manager();
        saves.save_game(&sample_state(), "node0x0_reboot", 1).unwrap();
        assert!(saves.has_save(1));
        saves.delete_save(1);
        assert!(!saves.has_save(1));
        saves.delete_save(1);
    }
}
