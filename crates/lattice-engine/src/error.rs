//! Engine-level error types.

use thiserror::Error;

use crate::surface::UiError;

/// Convenience alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Anything that can go wrong while driving a session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A scene id was requested that no registered factory can build.
    /// This is a content wiring mistake and is fatal to the session.
    #[error("unknown scene id: {0}")]
    UnknownScene(String),

    /// A choice menu was constructed with zero options.
    #[error("choice menu needs at least one option")]
    EmptyMenu,

    /// The presentation layer failed or the player interrupted it.
    #[error(transparent)]
    Ui(#[from] UiError),
}
