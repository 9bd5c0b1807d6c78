// SPDX-License-Identifier: MIT OR Apache-2.0
//! Strip definitions for the timeline.

use crate::channel::ChannelId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;
use uuid::Uuid;

/// Frame number on the timeline
pub type Frame = i64;

/// Unique identifier for a strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StripId(pub Uuid);

impl StripId {
    /// Create a new random strip ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StripId {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of media a strip plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StripKind {
    /// Audio clip
    Sound,
    /// Video clip
    Movie,
    /// Still image or image sequence
    Image,
    /// Another scene rendered as a clip
    Scene,
    /// Solid color
    Color,
    /// Text overlay
    Text,
    /// Effect applied over other strips
    Effect,
    /// Nested group of strips
    Meta,
}

impl StripKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sound => "SOUND",
            Self::Movie => "MOVIE",
            Self::Image => "IMAGE",
            Self::Scene => "SCENE",
            Self::Color => "COLOR",
            Self::Text => "TEXT",
            Self::Effect => "EFFECT",
            Self::Meta => "META",
        }
    }
}

/// Reference to the media behind a strip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// File path of the media, if any
    pub path: Option<String>,
}

impl SourceRef {
    /// Create a reference to a media file
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// File name component of the path
    pub fn file_name(&self) -> Option<&str> {
        let path = self.path.as_deref()?;
        path.rsplit(['/', '\\']).next().filter(|name| !name.is_empty())
    }
}

/// A strip on a channel covering `[start_frame, end_frame)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strip {
    /// Unique strip ID
    pub id: StripId,
    /// Channel this strip sits on
    pub channel: ChannelId,
    /// Display name
    pub name: String,
    /// Media type
    pub kind: StripKind,
    /// First frame (inclusive)
    pub start_frame: Frame,
    /// Last frame (exclusive)
    pub end_frame: Frame,
    /// Frames where the strip was previously cut
    pub cut_boundaries: BTreeSet<Frame>,
    /// Media reference
    pub source: SourceRef,
}

impl Strip {
    /// Create a new strip
    pub fn new(
        name: impl Into<String>,
        kind: StripKind,
        channel: ChannelId,
        start_frame: Frame,
        end_frame: Frame,
    ) -> Self {
        Self {
            id: StripId::new(),
            channel,
            name: name.into(),
            kind,
            start_frame,
            end_frame,
            cut_boundaries: BTreeSet::new(),
            source: SourceRef::default(),
        }
    }

    /// Set the media reference
    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.source = source;
        self
    }

    /// Set recorded cut boundaries
    pub fn with_cuts(mut self, cuts: impl IntoIterator<Item = Frame>) -> Self {
        self.cut_boundaries.extend(cuts);
        self
    }

    /// Number of frames covered
    pub fn length(&self) -> Frame {
        self.end_frame - self.start_frame
    }

    /// Frame range as a half-open range
    pub fn range(&self) -> Range<Frame> {
        self.start_frame..self.end_frame
    }

    /// Check if a frame lies strictly inside the strip
    pub fn contains_inner(&self, frame: Frame) -> bool {
        frame > self.start_frame && frame < self.end_frame
    }

    /// Check if this strip intersects a half-open range
    pub fn intersects(&self, range: &Range<Frame>) -> bool {
        self.start_frame < range.end && range.start < self.end_frame
    }

    /// Cut boundaries that fall strictly inside the strip
    pub fn inner_cuts(&self) -> impl Iterator<Item = Frame> + '_ {
        self.cut_boundaries
            .iter()
            .copied()
            .filter(|&frame| self.contains_inner(frame))
    }

    /// Move the strip and its cut boundaries by a frame delta
    pub fn translate(&mut self, delta: Frame) {
        if delta == 0 {
            return;
        }
        self.start_frame += delta;
        self.end_frame += delta;
        self.cut_boundaries = self.cut_boundaries.iter().map(|f| f + delta).collect();
    }

    /// Set a new length, dropping cut boundaries that fall outside
    pub fn set_length(&mut self, length: Frame) {
        self.end_frame = self.start_frame + length;
        let end = self.end_frame;
        self.cut_boundaries.retain(|&f| f < end);
    }
}
