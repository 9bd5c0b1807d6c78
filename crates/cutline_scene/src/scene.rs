// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory scene host.
//!
//! Holds objects, the timeline, animation curves and the object selection,
//! and implements [`SceneHost`] so every engine operation lands as exactly one
//! undo step.

use crate::error::{Result, SceneError};
use crate::history::{History, Snapshot};
use cutline_sequencer::{
    AnimatableTarget, Axis, Channel, ChannelId, EditBatch, KeyframeCurve, ObjectId, PropertyPath, SceneHost,
    SelectionSnapshot, SequencerError, Strip, StripId, Timeline,
};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Object with the properties it can animate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object name
    pub name: String,
    /// Animatable properties
    pub properties: IndexSet<PropertyPath>,
}

impl SceneObject {
    /// Create an object with location, rotation and scale channels
    pub fn new(name: impl Into<String>) -> Self {
        let mut properties = IndexSet::new();
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            properties.insert(PropertyPath::Location(axis));
            properties.insert(PropertyPath::Rotation(axis));
            properties.insert(PropertyPath::Scale(axis));
        }
        Self {
            name: name.into(),
            properties,
        }
    }
}

/// Everything one undo step restores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    /// Objects by id
    pub objects: IndexMap<ObjectId, SceneObject>,
    /// Sequencer timeline
    pub timeline: Timeline,
    /// Animation curves by target
    pub curves: IndexMap<AnimatableTarget, KeyframeCurve>,
    /// Selected objects in selection order
    pub selection: Vec<ObjectId>,
}

impl SceneState {
    fn new(name: impl Into<String>) -> Self {
        Self {
            objects: IndexMap::new(),
            timeline: Timeline::new(name),
            curves: IndexMap::new(),
            selection: Vec::new(),
        }
    }
}

/// Scene with undo history
#[derive(Debug)]
pub struct Scene {
    state: SceneState,
    history: History,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: SceneState::new(name),
            history: History::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// Sequencer timeline
    pub fn timeline(&self) -> &Timeline {
        &self.state.timeline
    }

    /// Undo history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Keyframes of a property
    pub fn keyframes(&self, target: &AnimatableTarget) -> Option<&KeyframeCurve> {
        self.state.curves.get(target)
    }

    /// Current selection in order
    pub fn selection(&self) -> &[ObjectId] {
        &self.state.selection
    }

    /// Add an object
    pub fn add_object(&mut self, object: SceneObject) -> Result<ObjectId> {
        let id = ObjectId::new();
        let label = format!("Add {}", object.name);
        self.apply(&label, |state| {
            state.objects.insert(id, object);
            Ok(id)
        })
    }

    /// Give an object another animatable property, such as a shape key
    pub fn add_property(&mut self, object: ObjectId, property: PropertyPath) -> Result<()> {
        let label = format!("Add Property {property}");
        self.apply(&label, |state| {
            let data = state
                .objects
                .get_mut(&object)
                .ok_or(SceneError::ObjectNotFound(object))?;
            data.properties.insert(property);
            Ok(())
        })
    }

    /// Delete an object with its curves and selection entry
    pub fn remove_object(&mut self, object: ObjectId) -> Result<SceneObject> {
        self.apply("Delete Object", |state| {
            let removed = state
                .objects
                .shift_remove(&object)
                .ok_or(SceneError::ObjectNotFound(object))?;
            state.curves.retain(|target, _| target.object != object);
            state.selection.retain(|id| *id != object);
            Ok(removed)
        })
    }

    /// Replace the selection; unknown objects are skipped
    pub fn select(&mut self, objects: &[ObjectId]) {
        let selection =
            SelectionSnapshot::from_ids(objects.iter().copied().filter(|id| self.state.objects.contains_key(id)));
        self.state.selection = selection.into_ids();
        tracing::debug!("Selected {} objects", self.state.selection.len());
    }

    /// Place a strip on its channel
    pub fn add_strip(&mut self, strip: Strip) -> Result<StripId> {
        let label = format!("Add Strip {}", strip.name);
        self.apply(&label, |state| {
            let channel = strip.channel;
            Ok(state.timeline.ensure_channel(channel).insert(strip)?)
        })
    }

    /// Revert the latest step
    pub fn undo(&mut self) -> Result<String> {
        let revision = self.history.undo()?;
        self.state = revision.before.to_value()?;
        tracing::info!("Undo: {}", revision.label);
        Ok(revision.label.clone())
    }

    /// Reapply the latest undone step
    pub fn redo(&mut self) -> Result<String> {
        let revision = self.history.redo()?;
        self.state = revision.after.to_value()?;
        tracing::info!("Redo: {}", revision.label);
        Ok(revision.label.clone())
    }

    fn apply<T>(&mut self, label: &str, edit: impl FnOnce(&mut SceneState) -> Result<T>) -> Result<T> {
        let before = Snapshot::from_value(&self.state)?;
        let mut working = self.state.clone();
        let value = edit(&mut working)?;
        let after = Snapshot::from_value(&working)?;

        self.state = working;
        let id = self.history.record(label, before, after);
        tracing::info!("Committed '{}' as revision {}", label, id);
        Ok(value)
    }
}

impl SceneHost for Scene {
    fn contains_object(&self, object: ObjectId) -> bool {
        self.state.objects.contains_key(&object)
    }

    fn has_property(&self, target: &AnimatableTarget) -> bool {
        self.state
            .objects
            .get(&target.object)
            .is_some_and(|object| object.properties.contains(&target.property))
    }

    fn curve(&self, target: &AnimatableTarget) -> Option<KeyframeCurve> {
        self.state.curves.get(target).cloned()
    }

    fn channel(&self, channel: ChannelId) -> Option<Channel> {
        self.state.timeline.channel(channel).cloned()
    }

    fn selected_objects(&self) -> Vec<ObjectId> {
        self.state.selection.clone()
    }

    fn commit(&mut self, batch: EditBatch) -> cutline_sequencer::Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        if let Some((target, _)) = batch.curves.iter().find(|(target, _)| !self.has_property(target)) {
            return Err(SequencerError::InvalidTarget(target.clone()));
        }
        if let Some(channel) = batch.channels.iter().find(|c| !c.validate()) {
            return Err(SequencerError::Host(format!(
                "channel {} has overlapping or empty strips",
                channel.id
            )));
        }

        let EditBatch {
            label,
            channels,
            curves,
            selection,
        } = batch;
        self.apply(&label, |state| {
            for channel in channels {
                state.timeline.set_channel(channel);
            }
            state.curves.extend(curves);
            if let Some(selection) = selection {
                state.selection = selection
                    .into_iter()
                    .filter(|id| state.objects.contains_key(id))
                    .collect();
            }
            Ok(())
        })
        .map_err(SequencerError::from)
    }
}
