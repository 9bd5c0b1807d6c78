// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history over serialized scene snapshots.
//!
//! Each revision stores the whole scene state before and after one commit,
//! encoded with `bincode`. Undo decodes `before`, redo decodes `after`.

use crate::error::{Result, SceneError};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::VecDeque;

/// Maximum undo history depth
pub const MAX_HISTORY: usize = 100;

/// Encoded scene state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    data: Vec<u8>,
}

impl Snapshot {
    /// Encode a value
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            data: bincode::serialize(value)?,
        })
    }

    /// Decode the stored value
    pub fn to_value<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(bincode::deserialize(&self.data)?)
    }

    /// Encoded size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// One undoable step
#[derive(Debug, Clone)]
pub struct Revision {
    /// Sequential revision number
    pub id: u64,
    /// Undo step description
    pub label: String,
    /// State before the step
    pub before: Snapshot,
    /// State after the step
    pub after: Snapshot,
}

impl Revision {
    /// Memory held by both snapshots
    pub fn memory_size(&self) -> usize {
        self.before.size() + self.after.size()
    }
}

/// Undo and redo stacks
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Revision>,
    redo_stack: Vec<Revision>,
    next_id: u64,
    max_depth: usize,
}

impl History {
    /// Create a history with the default depth
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create a history keeping at most `max_depth` undo steps
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            next_id: 1,
            max_depth: max_depth.max(1),
        }
    }

    /// Record a committed step, dropping anything that could be redone
    pub fn record(&mut self, label: impl Into<String>, before: Snapshot, after: Snapshot) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.redo_stack.clear();
        self.undo_stack.push_back(Revision {
            id,
            label: label.into(),
            before,
            after,
        });
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        id
    }

    /// Move the latest step to the redo stack and return it
    pub fn undo(&mut self) -> Result<&Revision> {
        let revision = self.undo_stack.pop_back().ok_or(SceneError::NothingToUndo)?;
        self.redo_stack.push(revision);
        self.redo_stack.last().ok_or(SceneError::NothingToUndo)
    }

    /// Move the latest undone step back to the undo stack and return it
    pub fn redo(&mut self) -> Result<&Revision> {
        let revision = self.redo_stack.pop().ok_or(SceneError::NothingToRedo)?;
        self.undo_stack.push_back(revision);
        self.undo_stack.back().ok_or(SceneError::NothingToRedo)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo steps
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the step undo would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().map(|r| r.label.as_str())
    }

    /// Label of the step redo would reapply
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|r| r.label.as_str())
    }

    /// Memory held by all revisions
    pub fn memory_used(&self) -> usize {
        self.undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .map(Revision::memory_size)
            .sum()
    }

    /// Drop all revisions
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
