// SPDX-License-Identifier: MIT OR Apache-2.0
//! Boundary to the host application's scene data.
//!
//! The engine never owns objects, channels or curves. It reads copies through
//! [`SceneHost`], builds the full result of an operation, and hands it back as
//! one [`EditBatch`]. The host applies a batch completely or not at all and
//! registers it as a single undo step.

use crate::binding::{AnimatableTarget, ObjectId};
use crate::channel::{Channel, ChannelId};
use crate::error::Result;
use crate::keyframe::KeyframeCurve;

/// Repository interface onto host-owned scene state
pub trait SceneHost {
    /// Check if an object exists
    fn contains_object(&self, object: ObjectId) -> bool;

    /// Check if an object exists and has the property
    fn has_property(&self, target: &AnimatableTarget) -> bool;

    /// Current keyframes of a property, `None` when it is not animated
    fn curve(&self, target: &AnimatableTarget) -> Option<KeyframeCurve>;

    /// Copy of a channel
    fn channel(&self, channel: ChannelId) -> Option<Channel>;

    /// Selected objects in the host's current order
    fn selected_objects(&self) -> Vec<ObjectId>;

    /// Apply every write in the batch as one undoable step
    fn commit(&mut self, batch: EditBatch) -> Result<()>;
}

/// All writes of one engine operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBatch {
    /// Undo step description
    pub label: String,
    /// Channels to replace wholesale
    pub channels: Vec<Channel>,
    /// Curves to replace wholesale
    pub curves: Vec<(AnimatableTarget, KeyframeCurve)>,
    /// Selection to restore after the edit
    pub selection: Option<Vec<ObjectId>>,
}

impl EditBatch {
    /// Create an empty batch
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Add a channel replacement
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Add a curve replacement
    pub fn with_curve(mut self, target: AnimatableTarget, curve: KeyframeCurve) -> Self {
        self.curves.push((target, curve));
        self
    }

    /// Restore a selection when the batch commits
    pub fn with_selection(mut self, selection: Vec<ObjectId>) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Check if the batch writes nothing
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() && self.curves.is_empty() && self.selection.is_none()
    }
}
