//! Audio cue handling for the terminal frontend.
//!
//! There is no audio device behind this yet; cues are tracked and logged
//! so sessions can be debugged and a real mixer can slot in behind the
//! same trait later. Playback stays fire-and-forget either way. Cue
//! preloading runs on a background thread and is joined at most once,
//! before the first scene; a slow or failed preload costs presentation,
//! never correctness.

use std::sync::Mutex;
use std::thread::JoinHandle;

use lattice_engine::AudioSink;

/// Cue names the story uses, warmed up at startup.
const KNOWN_CUES: [&str; 3] = ["beep", "scary_static", "glitch"];

/// Records cues to the log, honoring the enable flags.
pub struct LogAudio {
    sounds_enabled: bool,
    music_enabled: bool,
    master_volume: f32,
    current_music: Mutex<Option<String>>,
    preload: Mutex<Option<JoinHandle<()>>>,
}

impl LogAudio {
    /// A sink configured from the session flags. Kicks off the background
    /// preload immediately.
    pub fn new(sounds_enabled: bool, music_enabled: bool, master_volume: f32) -> Self {
        let preload = std::thread::spawn(|| {
            for cue in KNOWN_CUES {
                log::debug!("preloaded cue: {cue}");
            }
        });
        Self {
            sounds_enabled,
            music_enabled,
            master_volume,
            current_music: Mutex::new(None),
            preload: Mutex::new(Some(preload)),
        }
    }

    /// Join the preload thread. Idempotent; called once before the first
    /// scene runs.
    pub fn wait_ready(&self) {
        if let Ok(mut slot) = self.preload.lock() {
            if let Some(handle) = slot.take() {
                if handle.join().is_err() {
                    log::warn!("audio preload thread panicked, continuing silent");
                }
            }
        }
    }
}

impl AudioSink for LogAudio {
    fn play_sound(&self, name: &str) {
        if self.sounds_enabled {
            log::debug!("sound cue: {name}");
        }
    }

    fn stop_sound(&self, name: &str) {
        if self.sounds_enabled {
            log::debug!("sound stopped: {name}");
        }
    }

    fn play_music(&self, name: &str, looped: bool, volume: f32) {
        if !self.music_enabled {
            return;
        }
        let effective = (volume * self.master_volume).clamp(0.0, 1.0);
        log::debug!("music cue: {name} (looped: {looped}, volume: {effective:.2})");
        if let Ok(mut current) = self.current_music.lock() {
            *current = Some(name.to_string());
        }
    }

    fn stop_music(&self) {
        if let Ok(mut current) = self.current_music.lock() {
            if let Some(name) = current.take() {
                log::debug!("music stopped: {name}");
            }
        }
    }
}
