// SPDX-License-Identifier: MIT OR Apache-2.0
//! Minimal in-memory host for unit tests.

use crate::binding::{AnimatableTarget, ObjectId};
use crate::channel::{Channel, ChannelId};
use crate::error::Result;
use crate::host::{EditBatch, SceneHost};
use crate::keyframe::KeyframeCurve;
use crate::strip::{Strip, StripId};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub(crate) struct MemoryHost {
    pub objects: HashSet<ObjectId>,
    pub channels: IndexMap<ChannelId, Channel>,
    pub curves: HashMap<AnimatableTarget, KeyframeCurve>,
    pub selection: Vec<ObjectId>,
    pub commits: usize,
}

impl MemoryHost {
    pub fn add_object(&mut self, object: ObjectId) -> ObjectId {
        self.objects.insert(object);
        object
    }

    pub fn add_strip(&mut self, strip: Strip) -> StripId {
        let channel_id = strip.channel;
        self.channels
            .entry(channel_id)
            .or_insert_with(|| Channel::new(channel_id))
            .insert(strip)
            .unwrap()
    }
}

impl SceneHost for MemoryHost {
    fn contains_object(&self, object: ObjectId) -> bool {
        self.objects.contains(&object)
    }

    fn has_property(&self, target: &AnimatableTarget) -> bool {
        self.contains_object(target.object)
    }

    fn curve(&self, target: &AnimatableTarget) -> Option<KeyframeCurve> {
        self.curves.get(target).cloned()
    }

    fn channel(&self, channel: ChannelId) -> Option<Channel> {
        self.channels.get(&channel).cloned()
    }

    fn selected_objects(&self) -> Vec<ObjectId> {
        self.selection.clone()
    }

    fn commit(&mut self, batch: EditBatch) -> Result<()> {
        for channel in batch.channels {
            self.channels.insert(channel.id, channel);
        }
        self.curves.extend(batch.curves);
        if let Some(selection) = batch.selection {
            self.selection = selection;
        }
        self.commits += 1;
        Ok(())
    }
}
