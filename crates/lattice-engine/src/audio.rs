//! The audio seam.
//!
//! Scenes cue sounds by logical name through [`AudioSink`]; whether
//! anything actually plays is the backend's business. Playback is
//! fire-and-forget: a missing asset or a dead audio device degrades to
//! silence, never to a scene failure, so every method is infallible.

/// Receiver for audio cues.
pub trait AudioSink {
    /// Play a one-shot sound effect.
    fn play_sound(&self, name: &str);

    /// Stop a named sound, if it is still playing.
    fn stop_sound(&self, name: &str);

    /// Start (or replace) background music at the given volume in [0, 1].
    fn play_music(&self, name: &str, looped: bool, volume: f32);

    /// Stop background music, if any is playing.
    fn stop_music(&self);
}

/// Discards every cue. Used by tests and by `--no-audio` sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_sound(&self, _name: &str) {}

    fn stop_sound(&self, _name: &str) {}

    fn play_music(&self, _name: &str, _looped: bool, _volume: f32) {}

    fn stop_music(&self) {}
}
