// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene errors.

use cutline_sequencer::{ObjectId, SequencerError};
use thiserror::Error;

/// Errors raised by the in-memory scene
#[derive(Debug, Error)]
pub enum SceneError {
    /// Undo stack is empty
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Redo stack is empty
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Object not found in the scene
    #[error("Object not found: {0:?}")]
    ObjectNotFound(ObjectId),

    /// State snapshot could not be written or read
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// Timeline or keyframe edit failed
    #[error(transparent)]
    Sequencer(#[from] SequencerError),
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;

impl From<SceneError> for SequencerError {
    fn from(err: SceneError) -> Self {
        match err {
            SceneError::Sequencer(err) => err,
            other => SequencerError::Host(other.to_string()),
        }
    }
}
