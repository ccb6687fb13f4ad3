//! Scenes and the registry that builds them.
//!
//! Story content implements [`Scene`] and registers a factory under its
//! id. The director looks ids up here and nowhere else; an id the
//! registry does not know is a wiring bug, not a fallback path.

use std::collections::HashMap;

use lattice_core::GameState;

use crate::audio::AudioSink;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::surface::Surface;

/// A scene id, as stored in saves and returned between scenes.
pub type SceneId = String;

/// Everything a scene may touch while running. Borrowed for the duration
/// of one `run` call; there is no global state behind it.
pub struct SceneContext<'a> {
    /// The presentation backend.
    pub surface: &'a mut dyn Surface,
    /// The player state, mutated through its typed operations.
    pub state: &'a mut GameState,
    /// Audio cue receiver.
    pub audio: &'a dyn AudioSink,
    /// Session configuration, read-only.
    pub config: &'a EngineConfig,
}

/// One unit of story content.
pub trait Scene {
    /// The id this scene is registered under.
    fn id(&self) -> &str;

    /// Play the scene to its end. Returns the id of the next scene, or
    /// `None` when this scene ends the playthrough.
    fn run(&mut self, ctx: &mut SceneContext<'_>) -> EngineResult<Option<SceneId>>;
}

type SceneFactory = Box<dyn Fn() -> Box<dyn Scene>>;

/// Maps scene ids to factories producing fresh scene values.
#[derive(Default)]
pub struct SceneRegistry {
    factories: HashMap<String, SceneFactory>,
}

impl SceneRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `id`, replacing any previous entry.
    pub fn register<S, F>(&mut self, id: &str, factory: F)
    where
        S: Scene + 'static,
        F: Fn() -> S + 'static,
    {
        self.factories
            .insert(id.to_string(), Box::new(move || Box::new(factory())));
    }

    /// Build a fresh instance of the scene registered under `id`.
    pub fn create(&self, id: &str) -> EngineResult<Box<dyn Scene>> {
        self.factories
            .get(id)
            .map(|factory| factory())
            .ok_or_else(|| EngineError::UnknownScene(id.to_string()))
    }

    /// Whether `id` has a registered factory.
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// All registered ids, sorted for stable listings.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticScene {
        id: &'static str,
        next: Option<&'static str>,
    }

    impl Scene for StaticScene {
        fn id(&self) -> &str {
            self.id
        }

        fn run(&mut self, _ctx: &mut SceneContext<'_>) -> EngineResult<Option<SceneId>> {
            Ok(self.next.map(String::from))
        }
    }

    #[test]
    fn create_builds_registered_scenes() {
        let mut registry = SceneRegistry::new();
        registry.register("node0x0_reboot", || StaticScene {
            id: "node0x0_reboot",
            next: Some("scene1_identity_sequence"),
        });

        let scene = registry.create("node0x0_reboot").unwrap();
        assert_eq!(scene.id(), "node0x0_reboot");
        assert!(registry.contains("node0x0_reboot"));
    }

    #[test]
    fn unknown_id_is_an_error() {
        let registry = SceneRegistry::new();
        let err = registry.create("node0xff").err().unwrap();
        assert!(matches!(err, EngineError::UnknownScene(id) if id == "node0xff"));
    }

    #[test]
    fn reregistering_replaces_the_factory() {
        let mut registry = SceneRegistry::new();
        registry.register("a", || StaticScene { id: "a", next: None });
        registry.register("a", || StaticScene {
            id: "a",
            next: Some("b"),
        });
        assert_eq!(registry.ids(), ["a"]);
    }

    #[test]
    fn ids_are_sorted() {
        let mut registry = SceneRegistry::new();
        registry.register("b", || StaticScene { id: "b", next: None });
        registry.register("a", || StaticScene { id: "a", next: None });
        assert_eq!(registry.ids(), ["a", "b"]);
    }
}
