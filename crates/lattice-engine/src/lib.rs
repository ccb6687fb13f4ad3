//! Scene progression engine for Fragments of the Lattice.
//!
//! The engine knows nothing about the story. It provides the pieces a
//! session is assembled from: the [`Scene`] trait and [`SceneRegistry`],
//! the [`Director`] loop that walks them, [`SaveManager`] persistence,
//! and the interaction primitives ([`ChoiceMenu`], [`TimedPuzzle`],
//! [`Notice`]) scenes drive through a [`Surface`] backend.

pub mod audio;
pub mod config;
pub mod director;
pub mod error;
pub mod headless;
pub mod menu;
pub mod puzzle;
pub mod save;
pub mod scene;
pub mod surface;

mod hash;

/// Audio cue receiver trait.
pub use audio::{AudioSink, NullAudio};
/// Session configuration.
pub use config::EngineConfig;
/// The progression loop, its outcomes, and the shared disconnect prompt.
pub use director::{Director, SessionEnd, confirm_disconnect};
/// Engine errors.
pub use error::{EngineError, EngineResult};
/// Scripted surface for tests.
pub use headless::{HeadlessSurface, Reply};
/// Cursor menus.
pub use menu::ChoiceMenu;
/// Timed word puzzles.
pub use puzzle::TimedPuzzle;
/// Save slots.
pub use save::{SaveManager, SaveRecord, SAVE_VERSION};
/// Scenes and their registry.
pub use scene::{Scene, SceneContext, SceneId, SceneRegistry};
/// The presentation seam.
pub use surface::{Hold, Notice, NoticeLine, Surface, TextStyle, UiError, UiResult};
