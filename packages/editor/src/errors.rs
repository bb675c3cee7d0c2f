//! Error types for collaborator seams.
//!
//! The reducer itself is total and never fails; errors only exist where
//! the engine talks to persistence and AI collaborators.

use thiserror::Error;

/// Persistence collaborator failure. Surfaced into `EditorState::error`
/// without clearing dirty-state, so the save stays retryable.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Save backend error: {0}")]
    Backend(String),
}

/// AI transform collaborator failure. Touches no document state; mutation
/// only ever happens on an explicit successful-result dispatch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Transform was cancelled before its result arrived")]
    Cancelled,

    #[error("Slide {0} no longer exists")]
    SlideOutOfRange(usize),

    #[error("Transform backend error: {0}")]
    Backend(String),
}
