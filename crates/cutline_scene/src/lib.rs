// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory host scene for Cutline.
//!
//! [`Scene`] owns objects, a timeline, animation curves and the selection, and
//! implements [`cutline_sequencer::SceneHost`]. Every commit is recorded as a
//! pair of `bincode` snapshots so it can be undone and redone as one step.

pub mod error;
pub mod history;
pub mod scene;

pub use error::{Result, SceneError};
pub use history::{History, Revision, Snapshot, MAX_HISTORY};
pub use scene::{Scene, SceneObject, SceneState};
