// SPDX-License-Identifier: MIT OR Apache-2.0
//! Selection snapshots.
//!
//! Host selection is ambient state that can change order between reads, so
//! operations that depend on it read it once into a [`SelectionSnapshot`] and
//! work from that value until they finish.

use crate::binding::ObjectId;
use crate::host::SceneHost;
use std::collections::HashSet;
use std::hash::Hash;

/// Ordered identifiers captured at the start of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot<T = ObjectId> {
    ids: Vec<T>,
}

impl<T: Copy + Eq + Hash> SelectionSnapshot<T> {
    /// Capture identifiers in the given order.
    ///
    /// Repeated identifiers keep their first position.
    pub fn from_ids(ids: impl IntoIterator<Item = T>) -> Self {
        let mut seen = HashSet::new();
        let ids = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        Self { ids }
    }

    /// Captured identifiers in capture order
    pub fn ids(&self) -> &[T] {
        &self.ids
    }

    /// Position of an identifier in capture order
    pub fn index_of(&self, id: T) -> Option<usize> {
        self.ids.iter().position(|i| *i == id)
    }

    /// Check if an identifier was captured
    pub fn contains(&self, id: T) -> bool {
        self.ids.contains(&id)
    }

    /// Drop identifiers that no longer satisfy `exists`
    pub fn retain_existing(&mut self, mut exists: impl FnMut(T) -> bool) {
        self.ids.retain(|id| exists(*id));
    }

    /// Number of captured identifiers
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if nothing was captured
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Consume the snapshot
    pub fn into_ids(self) -> Vec<T> {
        self.ids
    }
}

impl SelectionSnapshot<ObjectId> {
    /// Read the host's current object selection once
    pub fn capture<H: SceneHost + ?Sized>(host: &H) -> Self {
        Self::from_ids(host.selected_objects())
    }
}
