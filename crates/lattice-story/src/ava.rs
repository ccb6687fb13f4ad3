//! Node 0x2: meeting Ava and the first stabilization puzzle.

use std::time::Duration;

use lattice_core::Effect;
use lattice_engine::{
    ChoiceMenu, EngineResult, Scene, SceneContext, SceneId, Surface, TextStyle, TimedPuzzle,
};

/// This scene's registry id.
pub const SCENE_ID: &str = "node0x2_ava_intro";

/// Base time allowance for the tutorial puzzle, before stability bonus.
const PUZZLE_LIMIT: Duration = Duration::from_secs(10);

/// The Ava encounter: a three-way dialogue choice, her backstory, and
/// the tutorial timed puzzle. Ends the current content.
#[derive(Debug, Default)]
pub struct AvaScene;

impl AvaScene {
    /// Factory for the registry.
    pub fn new() -> Self {
        Self
    }

    fn puzzle_tutorial(&self, ctx: &mut SceneContext<'_>) -> EngineResult<()> {
        {
            let s = &mut *ctx.surface;
            s.type_out(
                "Listen, Caretaker. The Lattice is collapsing.",
                TextStyle::Dialogue,
            )?;
            s.type_out(
                "To stay here, to reach the Archive, you have to stabilize the nodes manually.",
                TextStyle::Dialogue,
            )?;
            s.type_out(
                "I can feel a fracture forming right now. Look at the console. It's scrambled code.",
                TextStyle::Dialogue,
            )?;
            s.type_out(
                "You have to type the correct string before the time runs out, or the corruption will spread.",
                TextStyle::Dialogue,
            )?;
            s.line("[SYSTEM]: PRESS [ENTER] TO OPEN THE CONSOLE", TextStyle::Alert)?;
            s.wait_for_enter()?;
        }

        let mut puzzle = TimedPuzzle::new("CORRUPTION", 1, PUZZLE_LIMIT, ctx.state.stability());
        let solved = ctx.surface.run_puzzle(&mut puzzle)?;

        if solved {
            ctx.surface.type_out(
                "Good. Fast. Very fast. That's how we stay alive in here.",
                TextStyle::Dialogue,
            )?;
            ctx.state.apply(&Effect::AdjustStability(1));
            ctx.state.record_puzzle_solved();
        } else {
            ctx.surface.type_out(
                "Too slow... the static... it's getting louder.",
                TextStyle::Dialogue,
            )?;
            ctx.surface.type_out(
                "Be careful, or you'll end up like me. A whisper in the dark.",
                TextStyle::Dialogue,
            )?;
            ctx.state.apply(&Effect::AdjustCorruption(1));
            ctx.state.record_puzzle_failed();
        }

        ctx.surface.type_out(
            "Ava begins to flicker again, her form losing cohesion.",
            TextStyle::Narration,
        )?;
        ctx.surface.type_out(
            "...don't let her fade... or perhaps... let the code recycle her...",
            TextStyle::Whisper,
        )?;
        Ok(())
    }
}

impl Scene for AvaScene {
    fn id(&self) -> &str {
        SCENE_ID
    }

    fn run(&mut self, ctx: &mut SceneContext<'_>) -> EngineResult<Option<SceneId>> {
        {
            let s = &mut *ctx.surface;
            ctx.audio.play_sound("beep");
            s.line("<<< ENTERING NODE 0x2: FRAGMENT ALPHA >>>", TextStyle::System)?;
            s.pause(Duration::from_millis(1500))?;

            s.type_out(
                "The scenery shifts. The endless corridor collapses into a single, small room.",
                TextStyle::Narration,
            )?;
            s.type_out(
                "There is a flicker in the center—a figure made of data shards.",
                TextStyle::Narration,
            )?;
            s.type_out("...Ava?...", TextStyle::Whisper)?;
            s.type_out(
                "The figure stabilizes for a moment. She looks at you with eyes that aren't quite aligned.",
                TextStyle::Narration,
            )?;
            s.type_out(
                "Is... is someone there? The Lattice... it feels so empty today.",
                TextStyle::Dialogue,
            )?;
        }

        let mut menu = ChoiceMenu::new(
            [
                "I am here. I'm the Caretaker.",
                "You're just a fragment. Stay still.",
                "(Remain silent)",
            ],
            ctx.state.corruption_level(),
        )?;
        match ctx.surface.choose(None, &mut menu)? {
            0 => {
                ctx.surface.type_out(
                    "Caretaker? I remember that word. It sounded... safe. Once.",
                    TextStyle::Dialogue,
                )?;
                ctx.state.apply(&Effect::AdjustStability(1));
                ctx.state.apply(&Effect::fragment("AvaMemory"));
            }
            1 => {
                ctx.surface.type_out(
                    "Fragment? Her static ripples harshly. I am... I was... I...",
                    TextStyle::Dialogue,
                )?;
                ctx.surface.type_out(
                    "You speak like the Architect. Cold. Calculating. But you're here. That means the nodes are failing, doesn't it?",
                    TextStyle::Dialogue,
                )?;
                ctx.state.apply(&Effect::AdjustCorruption(1));
            }
            _ => {
                ctx.surface.type_out(
                    "Hello? No one answers but the hum of the walls.",
                    TextStyle::Dialogue,
                )?;
                ctx.surface.type_out(
                    "The silence... it's the loudest part of the glitch.",
                    TextStyle::Dialogue,
                )?;
            }
        }

        {
            let s = &mut *ctx.surface;
            s.type_out(
                "Wait... you aren't one of them. You're... whole. Mostly. I was Ava. 0x41. 0x76. 0x61. Before the bleed started.",
                TextStyle::Dialogue,
            )?;
            s.type_out(
                "I used to manage the Great Records. I remember sunlight hitting a physical book once... or maybe I just downloaded that sensation.",
                TextStyle::Dialogue,
            )?;
            s.type_out(
                "In the Lattice, it's hard to tell what's a memory and what's just a cached file.",
                TextStyle::Dialogue,
            )?;
        }

        self.puzzle_tutorial(ctx)?;

        Ok(None)
    }
}
