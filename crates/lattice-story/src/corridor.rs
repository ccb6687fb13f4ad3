//! Node 0x1: the corridor and the first real choices.

use std::time::Duration;

use lattice_core::Effect;
use lattice_engine::{ChoiceMenu, EngineResult, Scene, SceneContext, SceneId, Surface, TextStyle};

/// This scene's registry id.
pub const SCENE_ID: &str = "scene1_identity_sequence";

/// Which way the player went at the whisper fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pull {
    Follow,
    Resist,
}

/// The corridor sequence: two choice points, each shifting the stats,
/// with a fragment hidden behind standing still.
#[derive(Debug, Default)]
pub struct CorridorScene;

impl CorridorScene {
    /// Factory for the registry.
    pub fn new() -> Self {
        Self
    }

    fn explore(&self, ctx: &mut SceneContext<'_>) -> EngineResult<()> {
        let s = &mut *ctx.surface;
        s.clear()?;
        s.type_out(
            "You decide to move forward. The corridor's walls ripple like liquid glass as it extends indefinitely.",
            TextStyle::Narration,
        )?;
        s.type_out(
            "Every step reverberates, not as sound, but as static bursts against your consciousness.",
            TextStyle::Narration,
        )?;
        s.type_out(
            "Shards of broken code dangle from the ceiling, swinging like icicles, fragments of memories long lost.",
            TextStyle::Narration,
        )?;
        s.type_out("You… are not alone…", TextStyle::Whisper)?;
        ctx.state.apply(&Effect::AdjustCorruption(1));
        s.pause(Duration::from_secs(1))?;

        s.type_out(
            "The deeper you go, the further reality warps. Your reflection in the walls flickers, sometimes showing someone else…",
            TextStyle::Narration,
        )?;
        s.type_out("or SOMEONE YOU MIGHT HAVE BEEN.", TextStyle::Alert)?;
        s.type_out("Every step… closer to yourself… or to me…", TextStyle::Whisper)?;
        ctx.state.apply(&Effect::AdjustCorruption(1));

        ctx.audio.play_sound("beep");
        s.line("[WARN] Stability decreasing... fragments detected.", TextStyle::Warning)?;
        ctx.state.apply(&Effect::AdjustStability(-1));

        s.type_out(
            "You feel a faint tug, like an unseen presence guiding you forward, whispering in broken code.",
            TextStyle::Narration,
        )?;
        s.type_out(
            "Fragments... they are watching... Follow... or stop... there is no difference...",
            TextStyle::Whisper,
        )?;
        ctx.state.apply(&Effect::AdjustCorruption(1));
        Ok(())
    }

    fn stand_still(&self, ctx: &mut SceneContext<'_>) -> EngineResult<()> {
        let s = &mut *ctx.surface;
        s.clear()?;
        s.type_out("You stand still. The silence stretches...", TextStyle::Narration)?;
        s.type_out("The corridor holds its breath with you.", TextStyle::Narration)?;
        s.type_out("> Thank you... I need more time to reach you...", TextStyle::Whisper)?;
        ctx.state.apply(&Effect::AdjustStability(1));

        s.type_out(
            "A flicker passes along the glass walls. Not corruption this time, but memory.",
            TextStyle::Narration,
        )?;
        s.type_out(
            "Fragment located... | identity shard detected...",
            TextStyle::Whisper,
        )?;
        ctx.state.apply(&Effect::fragment("shard_001"));

        s.type_out(
            "The walls whisper faintly, as though voices are trying to align themselves into words.",
            TextStyle::Narration,
        )?;
        s.type_out(
            "...don’t forget... caretaker... you are still here...",
            TextStyle::Whisper,
        )?;
        ctx.state.apply(&Effect::AdjustStability(1));

        s.type_out(
            "Then, as quickly as it came, the sensation fades, replaced by the cold hum of the corridor.",
            TextStyle::Narration,
        )?;
        Ok(())
    }

    fn pull_aftermath(&self, ctx: &mut SceneContext<'_>, pull: Pull) -> EngineResult<()> {
        let s = &mut *ctx.surface;
        s.clear()?;
        match pull {
            Pull::Follow => {
                s.type_out(
                    "You surrender to the pull. The corridor stops being a place and begins to feel like a pulse.",
                    TextStyle::Narration,
                )?;
                s.type_out(
                    "...good... much better... don't you feel the weight lifting?...",
                    TextStyle::Whisper,
                )?;
                s.line("[!] DATA OVERFLOW: Narrative streams merging.", TextStyle::Alert)?;
                ctx.state.apply(&Effect::AdjustCorruption(1));
            }
            Pull::Resist => {
                s.type_out(
                    "You plant your feet and refuse the guiding whispers. The air grows cold, and the walls hum with static protest.",
                    TextStyle::Narration,
                )?;
                s.type_out("...obstinate... you always were... persistent...", TextStyle::Whisper)?;
                s.line("[#] STABILITY CHECK: Identity tether holding.", TextStyle::Dialogue)?;
                ctx.state.apply(&Effect::AdjustStability(1));
            }
        }
        s.pause(Duration::from_secs(2))?;
        s.clear()?;
        s.line("<<< EXITING NODE 0x1 >>>", TextStyle::Narration)?;
        Ok(())
    }
}

impl Scene for CorridorScene {
    fn id(&self) -> &str {
        SCENE_ID
    }

    fn run(&mut self, ctx: &mut SceneContext<'_>) -> EngineResult<Option<SceneId>> {
        let name = ctx.state.player_name().to_string();
        {
            let s = &mut *ctx.surface;
            ctx.audio.play_sound("beep");
            s.line(&format!("[SYS] Identity registered: {name}"), TextStyle::System)?;
            s.pause(Duration::from_secs(1))?;
            ctx.audio.play_sound("beep");
            s.line("[WARN] Memory integrity... FRAGMENTED", TextStyle::Warning)?;
            s.pause(Duration::from_secs(1))?;

            s.type_out("The corridor shivers. Something presses against the walls of code.", TextStyle::Narration)?;
            s.type_out("A whisper leaks through the static...", TextStyle::Narration)?;
            s.pause(Duration::from_secs(1))?;
            s.clear()?;

            ctx.audio.play_sound("scary_static");
            for _ in 0..12 {
                s.line(&format!("...{name}...    ...{name}...    ...{name}..."), TextStyle::Alert)?;
            }
            ctx.audio.stop_sound("scary_static");
            s.clear()?;

            s.type_out("The corridor stretches endlessly in front of you.", TextStyle::Narration)?;
            s.type_out("The air hums with fractured memory.", TextStyle::Narration)?;
        }

        let mut menu = ChoiceMenu::new(
            ["Explore the corridor", "Stand still"],
            ctx.state.corruption_level(),
        )?;
        match ctx.surface.choose(None, &mut menu)? {
            0 => self.explore(ctx)?,
            _ => self.stand_still(ctx)?,
        }

        let mut menu = ChoiceMenu::new(
            ["Follow the guiding whispers", "Defy the pull and resist"],
            ctx.state.corruption_level(),
        )?;
        let pull = match ctx.surface.choose(None, &mut menu)? {
            0 => {
                ctx.surface
                    .type_out("...yes... deeper... don’t turn back now...", TextStyle::Whisper)?;
                ctx.state.apply(&Effect::AdjustCorruption(2));
                Pull::Follow
            }
            _ => {
                ctx.surface
                    .type_out("...no... don’t leave me here...", TextStyle::Whisper)?;
                ctx.state.apply(&Effect::AdjustStability(2));
                Pull::Resist
            }
        };
        self.pull_aftermath(ctx, pull)?;

        Ok(Some("node0x2_ava_intro".to_string()))
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
            CorridorScene::new().run(&mut ctx).unwrap()
        };
        (surface, next)
    }

    #[test]
    fn explore_then_follow_corrupts() {
        let mut state = GameState::new();
        let (_, next) = run_with(vec![Reply::Choice(0), Reply::Choice(0)], &mut state);
        // explore: +1 +1 +1 corruption, -1 stability; follow: +2 then +1.
        assert_eq!(state.corruption_level(), 6);
        assert_eq!(state.stability(), 2);
        assert!(state.identity_fragments().is_empty());
        assert_eq!(next.as_deref(), Some("node0x2_ava_intro"));
    }

    #[test]
    fn stand_still_grants_the_shard() {
        let mut state = GameState::new();
        let (surface, _) = run_with(vec![Reply::Choice(1), Reply::Choice(1)], &mut state);
        // stand still: +1 +1 stability and the shard; resist: +2 then +1.
        assert_eq!(state.stability(), 8);
        assert_eq!(state.corruption_level(), 0);
        assert_eq!(state.identity_fragments(), ["shard_001"]);
        assert!(surface.printed("identity shard detected"));
    }

    #[test]
    fn whispers_use_the_registered_name() {
        let mut state = GameState::new();
        state.register_name("Mira");
        let (surface, _) = run_with(vec![Reply::Choice(1), Reply::Choice(0)], &mut state);
        assert!(surface.printed("[SYS] Identity registered: Mira"));
        assert!(surface.printed("...Mira..."));
    }

    #[test]
    fn mixed_path_stand_still_then_follow() {
        let mut state = GameState::new();
        run_with(vec![Reply::Choice(1), Reply::Choice(0)], &mut state);
        // stand still: stability 3 -> 5; follow: corruption 0 -> 3.
        assert_eq!(state.stability(), 5);
        assert_eq!(state.corruption_level(), 3);
    }
}
