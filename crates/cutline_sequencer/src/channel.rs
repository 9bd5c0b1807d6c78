// SPDX-License-Identifier: MIT OR Apache-2.0
//! Channel definitions for the timeline.
//!
//! A channel holds strips sorted by start frame with no two strips
//! overlapping. Every mutating call either keeps that invariant or is
//! rejected without touching the channel.

use crate::error::{Result, SequencerError};
use crate::strip::{Frame, Strip, StripId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Channel index on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub u32);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A track of non-overlapping strips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel index
    pub id: ChannelId,
    /// Channel name
    pub name: String,
    /// Strips sorted by start frame
    strips: Vec<Strip>,
    /// Whether the channel is muted
    pub muted: bool,
    /// Whether the channel is locked
    pub locked: bool,
}

impl Channel {
    /// Create a new empty channel
    pub fn new(id: ChannelId) -> Self {
        Self {
            id,
            name: format!("Channel {id}"),
            strips: Vec::new(),
            muted: false,
            locked: false,
        }
    }

    /// Insert a strip, rejecting it if it overlaps an existing one
    pub fn insert(&mut self, mut strip: Strip) -> Result<StripId> {
        if strip.length() <= 0 {
            return Err(SequencerError::EmptyWindow(format!(
                "strip [{}, {}) has no frames",
                strip.start_frame, strip.end_frame
            )));
        }
        if self.position(strip.id).is_some() {
            return Err(SequencerError::DuplicateStrip(strip.id));
        }
        self.check_free(&strip, None)?;

        strip.channel = self.id;
        let id = strip.id;
        let idx = self.strips.partition_point(|s| s.start_frame < strip.start_frame);
        self.strips.insert(idx, strip);
        Ok(id)
    }

    /// Remove a strip
    pub fn remove(&mut self, strip_id: StripId) -> Result<Strip> {
        let idx = self
            .position(strip_id)
            .ok_or(SequencerError::StripNotFound(strip_id))?;
        Ok(self.strips.remove(idx))
    }

    /// Replace a strip with an edited copy of itself
    pub fn update(&mut self, mut strip: Strip) -> Result<()> {
        let idx = self
            .position(strip.id)
            .ok_or(SequencerError::StripNotFound(strip.id))?;
        if strip.length() <= 0 {
            return Err(SequencerError::EmptyWindow(format!(
                "strip [{}, {}) has no frames",
                strip.start_frame, strip.end_frame
            )));
        }
        self.check_free(&strip, Some(strip.id))?;

        strip.channel = self.id;
        self.strips.remove(idx);
        let idx = self.strips.partition_point(|s| s.start_frame < strip.start_frame);
        self.strips.insert(idx, strip);
        Ok(())
    }

    /// Swap a set of strips for a new set in one step.
    ///
    /// `removed` strips are taken out and `added` strips put in; if any of
    /// the added strips collides the channel is left exactly as it was.
    pub fn replace(&mut self, removed: &[StripId], added: Vec<Strip>) -> Result<()> {
        let mut working = self.clone();
        for id in removed {
            working.remove(*id)?;
        }
        for strip in added {
            working.insert(strip)?;
        }
        *self = working;
        Ok(())
    }

    /// Get all strips intersecting a frame range, ordered by start frame
    pub fn query(&self, range: Range<Frame>) -> Vec<&Strip> {
        let end = self.strips.partition_point(|s| s.start_frame < range.end);
        self.strips[..end]
            .iter()
            .filter(|s| s.intersects(&range))
            .collect()
    }

    /// Get strip by ID
    pub fn get(&self, strip_id: StripId) -> Option<&Strip> {
        self.strips.iter().find(|s| s.id == strip_id)
    }

    /// Get strip at a frame
    pub fn strip_at(&self, frame: Frame) -> Option<&Strip> {
        self.query(frame..frame + 1).into_iter().next()
    }

    /// Get all strips
    pub fn strips(&self) -> &[Strip] {
        &self.strips
    }

    /// Get strip count
    pub fn len(&self) -> usize {
        self.strips.len()
    }

    /// Check whether the channel is empty
    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    /// Frame where the last strip ends
    pub fn end_frame(&self) -> Frame {
        self.strips.last().map(|s| s.end_frame).unwrap_or(0)
    }

    /// Index of a strip in start-frame order
    pub fn position(&self, strip_id: StripId) -> Option<usize> {
        self.strips.iter().position(|s| s.id == strip_id)
    }

    /// Check that strips are sorted and pairwise non-overlapping
    pub fn validate(&self) -> bool {
        self.strips.iter().all(|s| s.length() > 0)
            && self
                .strips
                .windows(2)
                .all(|pair| pair[0].end_frame <= pair[1].start_frame)
    }

    fn check_free(&self, strip: &Strip, ignore: Option<StripId>) -> Result<()> {
        let range = strip.range();
        let blocking = self
            .query(range)
            .into_iter()
            .find(|existing| Some(existing.id) != ignore);

        match blocking {
            Some(existing) => Err(SequencerError::Overlap {
                channel: self.id,
                strip: strip.id,
                existing: existing.id,
                start: strip.start_frame,
                end: strip.end_frame,
            }),
            None => Ok(()),
        }
    }
}
