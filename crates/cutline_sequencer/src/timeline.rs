// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline containing multiple channels.

use crate::channel::{Channel, ChannelId};
use crate::strip::{Frame, Strip, StripId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A timeline of channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Timeline name
    pub name: String,
    /// Channels in this timeline
    channels: IndexMap<ChannelId, Channel>,
}

impl Timeline {
    /// Create a new timeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: IndexMap::new(),
        }
    }

    /// Get a channel, creating it if it does not exist
    pub fn ensure_channel(&mut self, channel_id: ChannelId) -> &mut Channel {
        self.channels
            .entry(channel_id)
            .or_insert_with(|| Channel::new(channel_id))
    }

    /// Put a channel in place of the one with the same id
    pub fn set_channel(&mut self, channel: Channel) {
        self.channels.insert(channel.id, channel);
    }

    /// Get a channel
    pub fn channel(&self, channel_id: ChannelId) -> Option<&Channel> {
        self.channels.get(&channel_id)
    }

    /// Get all channels
    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    /// Get every strip on every channel
    pub fn strips(&self) -> impl Iterator<Item = &Strip> {
        self.channels.values().flat_map(|c| c.strips().iter())
    }

    /// Find a strip on any channel
    pub fn find_strip(&self, strip_id: StripId) -> Option<&Strip> {
        self.strips().find(|s| s.id == strip_id)
    }

    /// Get the frame where the last strip ends
    pub fn content_end(&self) -> Frame {
        self.channels.values().map(Channel::end_frame).max().unwrap_or(0)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new("Untitled Timeline")
    }
}
