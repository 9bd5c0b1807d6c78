// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for timeline and keyframe operations.
//!
//! Every error is local to one operation. The operation that returns it has
//! not written anything to the channel or the host.

use crate::binding::AnimatableTarget;
use crate::channel::ChannelId;
use crate::strip::{Frame, StripId};
use thiserror::Error;

/// Sequencer errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequencerError {
    /// A strip would intersect another strip on the same channel
    #[error("Strip {strip:?} [{start}, {end}) overlaps {existing:?} on channel {channel}")]
    Overlap {
        /// Channel holding both strips
        channel: ChannelId,
        /// Strip being placed
        strip: StripId,
        /// Strip already occupying the range
        existing: StripId,
        /// Start of the rejected interval
        start: Frame,
        /// End of the rejected interval
        end: Frame,
    },

    /// A cut point does not lie strictly inside the strip
    #[error("Frame {frame} is outside strip range ({start}, {end})")]
    OutOfRange {
        /// Requested frame
        frame: Frame,
        /// Strip start frame
        start: Frame,
        /// Strip end frame
        end: Frame,
    },

    /// Strips to merge do not touch
    #[error("Strips are not adjacent: left ends at {left_end}, right starts at {right_start}")]
    NotAdjacent {
        /// End frame of the left strip
        left_end: Frame,
        /// Start frame of the right strip
        right_start: Frame,
    },

    /// The animatable target is missing on the host
    #[error("Invalid animation target: {0}")]
    InvalidTarget(AnimatableTarget),

    /// A frame window has zero or negative length
    #[error("Empty frame window: {0}")]
    EmptyWindow(String),

    /// Too few strips or targets for the operation
    #[error("Insufficient input: need at least {required}, got {actual}")]
    InsufficientInput {
        /// Minimum accepted count
        required: usize,
        /// Count that was supplied
        actual: usize,
    },

    /// Strip not found on the channel
    #[error("Strip not found: {0:?}")]
    StripNotFound(StripId),

    /// Channel not found on the host
    #[error("Channel not found: {0}")]
    ChannelNotFound(ChannelId),

    /// Strip is not tracked by the substrip group
    #[error("Strip {0:?} is not part of the substrip group")]
    NotInGroup(StripId),

    /// A strip with the same id already exists on the channel
    #[error("Duplicate strip id: {0:?}")]
    DuplicateStrip(StripId),

    /// Keyframe frames are not strictly increasing
    #[error("Keyframe at frame {frame} does not follow frame {previous}")]
    UnorderedKeyframes {
        /// Previous keyframe frame
        previous: Frame,
        /// Offending keyframe frame
        frame: Frame,
    },

    /// Shuffle policy cannot be satisfied
    #[error("Invalid shuffle policy: {0}")]
    InvalidPolicy(String),

    /// Name filter could not be compiled
    #[error("Invalid name pattern: {0}")]
    Pattern(String),

    /// Settings could not be parsed or written
    #[error("Settings error: {0}")]
    Settings(String),

    /// The host rejected a commit
    #[error("Host error: {0}")]
    Host(String),
}

/// Result type for sequencer operations
pub type Result<T> = std::result::Result<T, SequencerError>;
