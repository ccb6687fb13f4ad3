//! The scene progression loop.
//!
//! The director owns the walk from scene to scene: build the scene,
//! stamp and autosave the state at the boundary, run it, follow the id
//! it returns. Scenes never save and never know about each other; the
//! chain of returned ids is the whole story graph.

use std::time::{Duration, Instant};

use lattice_core::{GameState, NODE_COMPLETE};

use crate::error::{EngineError, EngineResult};
use crate::save::SaveManager;
use crate::scene::{SceneContext, SceneRegistry};
use crate::surface::{Notice, Surface, TextStyle, UiError};

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// A scene returned no successor: the playthrough is complete.
    Completed,
    /// The player interrupted and confirmed the disconnect.
    Disconnected,
    /// A scene failed; the session cannot continue. The last autosave
    /// still holds the boundary it started from.
    Faulted {
        /// The scene that failed.
        scene_id: String,
    },
}

/// Drives scenes from a registry, autosaving at every boundary.
pub struct Director<'a> {
    registry: &'a SceneRegistry,
    saves: &'a SaveManager,
    slot: u32,
}

impl<'a> Director<'a> {
    /// A director over `registry`, persisting to `slot` via `saves`.
    pub fn new(registry: &'a SceneRegistry, saves: &'a SaveManager, slot: u32) -> Self {
        Self {
            registry,
            saves,
            slot,
        }
    }

    /// Run scenes starting from `start` until the story completes, the
    /// player disconnects, or a scene faults.
    ///
    /// An id with no registered scene is a configuration error and is
    /// returned as `Err`; everything else resolves to a [`SessionEnd`].
    pub fn run(&self, ctx: &mut SceneContext<'_>, start: &str) -> EngineResult<SessionEnd> {
        let mut current = start.to_string();
        loop {
            let mut scene = match self.registry.create(&current) {
                Ok(scene) => scene,
                Err(err) => {
                    log::error!("cannot continue: {err}");
                    return Err(err);
                }
            };

            // Scene boundary: stamp the state and save it, so a resume
            // re-enters this scene from its beginning. The snapshot is
            // the boundary itself; a replayed scene starts from it.
            ctx.state.set_current_node(&current);
            ctx.state.record_node_visit();
            let boundary = ctx.state.snapshot();
            self.autosave(ctx, &current);

            loop {
                log::info!("entering scene {current}");
                let entered = Instant::now();
                let outcome = scene.run(ctx);
                ctx.state.add_playtime(entered.elapsed().as_secs_f64());

                match outcome {
                    Ok(Some(next)) => {
                        current = next;
                        break;
                    }
                    Ok(None) => {
                        ctx.state.set_current_node(NODE_COMPLETE);
                        self.autosave(ctx, NODE_COMPLETE);
                        log::info!("playthrough complete, ending {}", ctx.state.ending());
                        return Ok(SessionEnd::Completed);
                    }
                    Err(EngineError::Ui(UiError::Interrupted)) => {
                        if confirm_disconnect(ctx.surface)? {
                            return Ok(SessionEnd::Disconnected);
                        }
                        // Declined: discard whatever the aborted attempt
                        // changed and replay a fresh scene from the
                        // boundary snapshot, so no effect lands twice.
                        *ctx.state = GameState::from_snapshot(boundary.clone());
                        scene = self.registry.create(&current)?;
                    }
                    Err(err) => {
                        log::error!("scene {current} faulted: {err}");
                        return Ok(SessionEnd::Faulted { scene_id: current });
                    }
                }
            }
        }
    }

    /// Autosave is best-effort: a failed write warns the player in-world
    /// and the session keeps going.
    fn autosave(&self, ctx: &mut SceneContext<'_>, scene_id: &str) {
        if let Err(err) = self.saves.save_game(ctx.state, scene_id, self.slot) {
            log::warn!("autosave at {scene_id} failed: {err}");
            let notice = Notice::new("NODE FAILURE")
                .line("FRAGMENT WRITE REJECTED", TextStyle::Alert)
                .blank()
                .line("Progress past this point may not persist.", TextStyle::Plain)
                .hold_for(Duration::from_secs(2));
            let _ = ctx.surface.message_box(&notice);
        }
    }

}

/// Ask the player to confirm a disconnect. Used wherever an interrupt
/// surfaces, inside and outside a scene. A second interrupt while the
/// box is open counts as confirmation.
pub fn confirm_disconnect(surface: &mut dyn Surface) -> EngineResult<bool> {
    let notice = Notice::new("DISCONNECT")
        .line("TERMINATE CONNECTION?", TextStyle::Alert)
        .blank()
        .line("Unsynchronized fragments will be lost.", TextStyle::Plain)
        .line("Neural feedback may occur.", TextStyle::Narration)
        .choices(["CANCEL", "CONFIRM"]);
    match surface.message_box(&notice) {
        Ok(Some(1)) => Ok(true),
        Ok(_) => Ok(false),
        Err(UiError::Interrupted) => Ok(true),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lattice_core::GameState;

    use crate::audio::NullAudio;
    use crate::config::EngineConfig;
    use crate::headless::{HeadlessSurface, Reply};
    use crate::scene::{Scene, SceneId};
    use crate::surface::Surface;

    /// A scene that prints its id, optionally asks a one-option menu
    /// (so interrupts have a prompt to land on), and moves on.
    struct HopScene {
        id: &'static str,
        next: Option<&'static str>,
        prompt: bool,
    }

    impl Scene for HopScene {
        fn id(&self) -> &str {
            self.id
        }

        fn run(&mut self, ctx: &mut SceneContext<'_>) -> EngineResult<Option<SceneId>> {
            ctx.surface.line(self.id, TextStyle::Plain)?;
            if self.prompt {
                let mut menu = crate::ChoiceMenu::new(["continue"], 0)?;
                ctx.surface.choose(None, &mut menu)?;
            }
            Ok(self.next.map(String::from))
        }
    }

    fn two_hop_registry(prompt: bool) -> SceneRegistry {
        let mut registry = SceneRegistry::new();
        registry.register("first", move || HopScene {
            id: "first",
            next: Some("last"),
            prompt,
        });
        registry.register("last", move || HopScene {
            id: "last",
            next: None,
            prompt,
        });
        registry
    }

    fn run_session(
        registry: &SceneRegistry,
        saves: &SaveManager,
        surface: &mut HeadlessSurface,
        state: &mut GameState,
        start: &str,
    ) -> EngineResult<SessionEnd> {
        let config = EngineConfig::default();
        let audio = NullAudio;
        let mut ctx = SceneContext {
            surface,
            state,
            audio: &audio,
            config: &config,
        };
        Director::new(registry, saves, 1).run(&mut ctx, start)
    }

    #[test]
    fn completes_when_a_scene_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::new(dir.path());
        let registry = two_hop_registry(false);
        let mut surface = HeadlessSurface::new();
        let mut state = GameState::new();

        let end = run_session(&registry, &saves, &mut surface, &mut state, "first").unwrap();
        assert_eq!(end, SessionEnd::Completed);
        assert!(surface.printed("first"));
        assert!(surface.printed("last"));
        assert_eq!(state.current_node_id(), lattice_core::NODE_COMPLETE);
        assert_eq!(state.nodes_visited(), 2);
    }

    #[test]
    fn final_save_marks_completion() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::new(dir.path());
        let registry = two_hop_registry(false);
        let mut surface = HeadlessSurface::new();
        let mut state = GameState::new();

        run_session(&registry, &saves, &mut surface, &mut state, "first").unwrap();
        let record = saves.load_game(1).unwrap();
        assert_eq!(record.scene_id, lattice_core::NODE_COMPLETE);
    }

    #[test]
    fn boundary_save_precedes_the_scene_body() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::new(dir.path());

        let mut registry = SceneRegistry::new();
        registry.register("first", || HopScene {
            id: "first",
            next: Some("boom"),
            prompt: false,
        });
        struct FaultScene;
        impl Scene for FaultScene {
            fn id(&self) -> &str {
                "boom"
            }
            fn run(&mut self, _ctx: &mut SceneContext<'_>) -> EngineResult<Option<SceneId>> {
                Err(EngineError::Ui(UiError::Terminal("lost tty".to_string())))
            }
        }
        registry.register("boom", || FaultScene);

        let mut surface = HeadlessSurface::new();
        let mut state = GameState::new();
        let end = run_session(&registry, &saves, &mut surface, &mut state, "first").unwrap();

        assert_eq!(
            end,
            SessionEnd::Faulted {
                scene_id: "boom".to_string()
            }
        );
        // The save taken on entry to the faulting scene survives.
        assert_eq!(saves.load_game(1).unwrap().scene_id, "boom");
    }

    #[test]
    fn unknown_start_scene_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::new(dir.path());
        let registry = SceneRegistry::new();
        let mut surface = HeadlessSurface::new();
        let mut state = GameState::new();

        let err =
            run_session(&registry, &saves, &mut surface, &mut state, "nowhere").unwrap_err();
        assert!(matches!(err, EngineError::UnknownScene(id) if id == "nowhere"));
    }

    #[test]
    fn confirmed_interrupt_disconnects() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::new(dir.path());
        let registry = two_hop_registry(true);
        let mut surface =
            HeadlessSurface::with_replies([Reply::Interrupt, Reply::Choice(1)]);
        let mut state = GameState::new();

        let end = run_session(&registry, &saves, &mut surface, &mut state, "first").unwrap();
        assert_eq!(end, SessionEnd::Disconnected);
        // The boundary save still points at the interrupted scene.
        assert_eq!(saves.load_game(1).unwrap().scene_id, "first");
    }

    #[test]
    fn declined_interrupt_replays_the_scene() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::new(dir.path());
        let registry = two_hop_registry(true);
        let mut surface = HeadlessSurface::with_replies([
            Reply::Interrupt,
            Reply::Choice(0), // CANCEL
            Reply::Choice(0), // continue through "first"
            Reply::Choice(0), // continue through "last"
        ]);
        let mut state = GameState::new();

        let end = run_session(&registry, &saves, &mut surface, &mut state, "first").unwrap();
        assert_eq!(end, SessionEnd::Completed);
        let first_prints = surface
            .transcript()
            .iter()
            .filter(|line| *line == "first")
            .count();
        assert_eq!(first_prints, 2);
    }

    #[test]
    fn declined_interrupt_discards_partial_effects() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::new(dir.path());

        // A scene that corrupts before its prompt: interrupting at the
        // prompt leaves that mutation in memory.
        struct TaintScene;
        impl Scene for TaintScene {
            fn id(&self) -> &str {
                "taint"
            }
            fn run(&mut self, ctx: &mut SceneContext<'_>) -> EngineResult<Option<SceneId>> {
                ctx.state.apply_corruption(1);
                let mut menu = crate::ChoiceMenu::new(["continue"], 0)?;
                ctx.surface.choose(None, &mut menu)?;
                Ok(None)
            }
        }
        let mut registry = SceneRegistry::new();
        registry.register("taint", || TaintScene);

        let mut surface = HeadlessSurface::with_replies([
            Reply::Interrupt,
            Reply::Choice(0), // CANCEL
            Reply::Choice(0), // play the scene through
        ]);
        let mut state = GameState::new();
        let end = run_session(&registry, &saves, &mut surface, &mut state, "taint").unwrap();

        assert_eq!(end, SessionEnd::Completed);
        // The aborted attempt's corruption was rolled back before the
        // replay, so the scene's effect lands exactly once.
        assert_eq!(state.corruption_level(), 1);
        assert_eq!(state.nodes_visited(), 1);
    }

    #[test]
    fn double_interrupt_disconnects() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::new(dir.path());
        let registry = two_hop_registry(true);
        let mut surface =
            HeadlessSurface::with_replies([Reply::Interrupt, Reply::Interrupt]);
        let mut state = GameState::new();

        let end = run_session(&registry, &saves, &mut surface, &mut state, "first").unwrap();
        assert_eq!(end, SessionEnd::Disconnected);
    }

    #[test]
    fn resume_from_save_reenters_the_saved_scene() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::new(dir.path());
        let registry = two_hop_registry(false);

        // First session disconnects at "last" via a fault-free path:
        // run only "first", then simulate resume from its save record.
        let mut surface = HeadlessSurface::new();
        let mut state = GameState::new();
        run_session(&registry, &saves, &mut surface, &mut state, "first").unwrap();

        let record = saves.load_game(1).unwrap();
        let mut resumed = GameState::from_snapshot(record.state);
        assert_eq!(resumed.current_node_id(), lattice_core::NODE_COMPLETE);

        // A completed save resumes as a fresh look at the ending, not a
        // crash: the caller checks for NODE_COMPLETE before directing.
        resumed.set_current_node("first");
        let mut surface = HeadlessSurface::new();
        let end =
            run_session(&registry, &saves, &mut surface, &mut resumed, "first").unwrap();
        assert_eq!(end, SessionEnd::Completed);
    }
}
