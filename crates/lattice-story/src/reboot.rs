//! Node 0x0: the reboot sequence and identity prompt.

use std::time::Duration;

use lattice_engine::{EngineResult, Scene, SceneContext, SceneId, Surface, TextStyle};

use crate::bars::stability_readout;

/// This scene's registry id.
pub const SCENE_ID: &str = "node0x0_reboot";

/// The opening scene. Boot logs, the waking-up description, then the
/// one prompt in the game that takes free text: the player's name.
/// An empty answer keeps the default name.
#[derive(Debug, Default)]
pub struct RebootScene;

impl RebootScene {
    /// Factory for the registry.
    pub fn new() -> Self {
        Self
    }
}

impl Scene for RebootScene {
    fn id(&self) -> &str {
        SCENE_ID
    }

    fn run(&mut self, ctx: &mut SceneContext<'_>) -> EngineResult<Option<SceneId>> {
        let s = &mut *ctx.surface;
        s.clear()?;
        ctx.audio.play_sound("beep");
        s.line("[BOOT] Realigning fragments...", TextStyle::System)?;
        s.pause(Duration::from_millis(750))?;
        s.line("Identity: [UNRESOLVED]", TextStyle::Warning)?;
        s.line("Location: Node-01 [UNRESOLVED]", TextStyle::Warning)?;
        s.line(&stability_readout(ctx.state), TextStyle::Warning)?;
        s.pause(Duration::from_secs(1))?;

        s.type_out("You awaken in a dim corridor of fractured light.", TextStyle::Narration)?;
        s.type_out("Walls flicker between stone, glass, and raw code.", TextStyle::Narration)?;
        s.type_out("Every few seconds, the floor beneath you glitches.", TextStyle::Whisper)?;
        s.type_out("half pixel, half memory.", TextStyle::Narration)?;
        s.pause(Duration::from_millis(500))?;

        s.type_out(
            "A distorted console prompt waits, cursor blinking like an eye:",
            TextStyle::Narration,
        )?;
        ctx.audio.play_sound("beep");
        s.type_out("... Who... are you? ...", TextStyle::Whisper)?;

        let name = s.read_line("> ")?;
        let name = name.trim();
        if name.is_empty() {
            s.clear()?;
            s.type_out("I see you are shy from telling me your name...", TextStyle::Whisper)?;
            s.type_out("Are you hiding from yourself?", TextStyle::Whisper)?;
            s.type_out(
                "Oh well... looks like you gotta use your old name...",
                TextStyle::Whisper,
            )?;
            s.pause(Duration::from_millis(1250))?;
        } else {
            ctx.state.register_name(name);
        }
        s.clear()?;

        Ok(Some("scene1_identity_sequence".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lattice_core::GameState;
    use lattice_engine::{EngineConfig, HeadlessSurface, NullAudio, Reply};

    fn run_with(replies: Vec<Reply>, state: &mut GameState) -> (HeadlessSurface, Option<SceneId>) {
        let mut surface = HeadlessSurface::with_replies(replies);
        let config = EngineConfig::default();
        let audio = NullAudio;
        let next = {
            let mut ctx = SceneContext {
                surface: &mut surface,
                state,
                audio: &audio,
                config: &config,
            };
            RebootScene::new().run(&mut ctx).unwrap()
        };
        (surface, next)
    }

    #[test]
    fn registers_the_typed_name() {
        let mut state = GameState::new();
        let (_, next) = run_with(vec![Reply::Text("Mira".to_string())], &mut state);
        assert_eq!(state.player_name(), "Mira");
        assert_eq!(next.as_deref(), Some("scene1_identity_sequence"));
    }

    #[test]
    fn whitespace_only_name_keeps_the_default() {
        let mut state = GameState::new();
        let (surface, _) = run_with(vec![Reply::Text("   ".to_string())], &mut state);
        assert_eq!(state.player_name(), "Caretaker");
        assert!(surface.printed("shy"));
    }

    #[test]
    fn shows_the_boot_readout() {
        let mut state = GameState::new();
        let (surface, _) = run_with(vec![Reply::Text("Mira".to_string())], &mut state);
        assert!(surface.printed("[BOOT] Realigning fragments..."));
        assert!(surface.printed("Stability: [███░░░░░░░] 3/10"));
    }
}
