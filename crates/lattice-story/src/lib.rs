//! Scene content for Fragments of the Lattice.
//!
//! Each module is one node of the story. [`registry`] wires them all up;
//! the engine never sees scene types directly, only ids.

pub mod ava;
pub mod corridor;
pub mod reboot;

mod bars;

use lattice_engine::SceneRegistry;

/// Id of the opening scene: the reboot and identity prompt.
pub const FIRST_SCENE: &str = reboot::SCENE_ID;

/// Build the registry of all story scenes.
pub fn registry() -> SceneRegistry {
    let mut registry = SceneRegistry::new();
    registry.register(reboot::SCENE_ID, reboot::RebootScene::new);
    registry.register(corridor::SCENE_ID, corridor::CorridorScene::new);
    registry.register(ava::SCENE_ID, ava::AvaScene::new);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_contains_every_scene() {
        let registry = registry();
        assert!(registry.contains(FIRST_SCENE));
        assert_eq!(
            registry.ids(),
            ["node0x0_reboot", "node0x2_ava_intro", "scene1_identity_sequence"]
        );
    }
}
