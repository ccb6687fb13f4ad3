//! Engine configuration.
//!
//! Loaded from a `config.json` next to the binary. Every field has a
//! default and the file may supply any subset; a missing or unreadable
//! file yields the defaults so a fresh checkout runs without setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Jump straight to this scene id, skipping the title screen.
    /// Development aid; `None` in normal play.
    pub test_scene: Option<String>,
    /// Skip the startup boot sequence.
    pub skip_startup: bool,
    /// Per-character delay of the teletype effect, in milliseconds.
    pub typing_delay_ms: u64,
    /// Baseline probability of cosmetic glitch artifacts, in [0, 1].
    pub glitch_intensity: f64,
    /// Whether background music plays.
    pub enable_music: bool,
    /// Whether one-shot sound effects play.
    pub enable_sounds: bool,
    /// Overall volume in [0, 1].
    pub master_volume: f32,
    /// Music volume in [0, 1], scaled by `master_volume`.
    pub music_volume: f32,
    /// Directory save slots are written to.
    pub save_dir: PathBuf,
    /// The slot the session reads and writes.
    pub save_slot: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            test_scene: None,
            skip_startup: false,
            typing_delay_ms: 30,
            glitch_intensity: 0.15,
            enable_music: true,
            enable_sounds: true,
            master_volume: 0.8,
            music_volume: 0.5,
            save_dir: PathBuf::from("saves"),
            save_slot: 1,
        }
    }
}

impl EngineConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file is the normal case and yields defaults silently;
    /// a file that exists but will not parse also yields defaults, with
    /// a warning, so a typo in the config never blocks play.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Self::default();
            }
            Err(err) => {
                log::warn!("cannot read {}: {err}, using defaults", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("malformed config {}: {err}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// The teletype delay as a [`Duration`].
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_playable() {
        let config = EngineConfig::default();
        assert!(config.test_scene.is_none());
        assert_eq!(config.typing_delay(), Duration::from_millis(30));
        assert_eq!(config.save_slot, 1);
        assert!(config.enable_music);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = EngineConfig::load(Path::new("definitely/not/here.json"));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"typing_delay_ms": 5, "enable_music": false}"#).unwrap();

        let config = EngineConfig::load(&path);
        assert_eq!(config.typing_delay_ms, 5);
        assert!(!config.enable_music);
        assert_eq!(config.save_slot, EngineConfig::default().save_slot);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(EngineConfig::load(&path), EngineConfig::default());
    }
}
