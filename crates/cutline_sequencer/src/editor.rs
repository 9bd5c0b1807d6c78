// SPDX-License-Identifier: MIT OR Apache-2.0
//! Strip editing: split, merge, subcut, extend, separate and every-other removal.
//!
//! Splits are remembered in each strip's `cut_boundaries`, and merges keep the
//! union, so a clip the user cut by hand can later be broken back into the same
//! pieces with [`StripEditor::subcut`] instead of being re-cut from scratch.

use crate::channel::Channel;
use crate::error::{Result, SequencerError};
use crate::strip::{Frame, Strip, StripId};
use serde::{Deserialize, Serialize};

/// Substrips derived from one strip's recorded cuts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstripGroup {
    /// Strip the group was cut from (its id lives on as the first member)
    pub source: StripId,
    /// Cut frames the group was derived from
    pub boundaries: Vec<Frame>,
    /// Members still tracked by the group, in timeline order
    members: Vec<StripId>,
}

impl SubstripGroup {
    /// Members in timeline order
    pub fn members(&self) -> &[StripId] {
        &self.members
    }

    /// Check if a strip is tracked by the group
    pub fn contains(&self, strip_id: StripId) -> bool {
        self.members.contains(&strip_id)
    }

    /// Member count
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the group tracks nothing
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn require(&self, strip_id: StripId) -> Result<()> {
        if self.contains(strip_id) {
            Ok(())
        } else {
            Err(SequencerError::NotInGroup(strip_id))
        }
    }
}

/// Strip editing operations on a single channel
pub struct StripEditor;

impl StripEditor {
    /// Split a strip in two at a frame strictly inside it.
    ///
    /// The left half keeps the strip id. Both halves record the split frame.
    pub fn split(channel: &mut Channel, strip_id: StripId, at_frame: Frame) -> Result<(StripId, StripId)> {
        let strip = Self::strip(channel, strip_id)?;
        if !strip.contains_inner(at_frame) {
            return Err(SequencerError::OutOfRange {
                frame: at_frame,
                start: strip.start_frame,
                end: strip.end_frame,
            });
        }

        let mut left = strip.clone();
        left.end_frame = at_frame;
        left.cut_boundaries.retain(|&f| f <= at_frame);
        left.cut_boundaries.insert(at_frame);

        let mut right = strip;
        right.id = StripId::new();
        right.start_frame = at_frame;
        right.cut_boundaries.retain(|&f| f >= at_frame);
        right.cut_boundaries.insert(at_frame);

        let ids = (left.id, right.id);
        channel.replace(&[strip_id], vec![left, right])?;
        tracing::debug!("Split strip {:?} at frame {}", strip_id, at_frame);
        Ok(ids)
    }

    /// Merge two touching strips into the left one
    pub fn merge(channel: &mut Channel, left_id: StripId, right_id: StripId) -> Result<StripId> {
        let left = Self::strip(channel, left_id)?;
        let right = Self::strip(channel, right_id)?;
        if left.end_frame != right.start_frame {
            return Err(SequencerError::NotAdjacent {
                left_end: left.end_frame,
                right_start: right.start_frame,
            });
        }

        let mut merged = left;
        merged.cut_boundaries.insert(merged.end_frame);
        merged.cut_boundaries.extend(right.cut_boundaries.iter().copied());
        merged.end_frame = right.end_frame;

        channel.replace(&[left_id, right_id], vec![merged])?;
        tracing::debug!("Merged strip {:?} into {:?}", right_id, left_id);
        Ok(left_id)
    }

    /// Break a strip into substrips at every recorded cut inside it
    pub fn subcut(channel: &mut Channel, strip_id: StripId) -> Result<SubstripGroup> {
        let strip = Self::strip(channel, strip_id)?;
        let boundaries: Vec<Frame> = strip.inner_cuts().collect();

        let mut edges = Vec::with_capacity(boundaries.len() + 2);
        edges.push(strip.start_frame);
        edges.extend(boundaries.iter().copied());
        edges.push(strip.end_frame);

        let children: Vec<Strip> = edges
            .windows(2)
            .enumerate()
            .map(|(i, span)| {
                let mut child = strip.clone();
                if i > 0 {
                    child.id = StripId::new();
                    child.name = format!("{}.{:03}", strip.name, i);
                }
                child.start_frame = span[0];
                child.end_frame = span[1];
                child.cut_boundaries.retain(|&f| f >= span[0] && f <= span[1]);
                child
            })
            .collect();

        let members = children.iter().map(|c| c.id).collect();
        channel.replace(&[strip_id], children)?;
        tracing::debug!(
            "Subcut strip {:?} into {} pieces",
            strip_id,
            boundaries.len() + 1
        );

        Ok(SubstripGroup {
            source: strip_id,
            boundaries,
            members,
        })
    }

    /// Record cuts every `period` frames from the strip start, then subcut
    pub fn cut_every(channel: &mut Channel, strip_id: StripId, period: Frame) -> Result<SubstripGroup> {
        if period <= 0 {
            return Err(SequencerError::EmptyWindow(format!(
                "cut period {period} must be positive"
            )));
        }
        let mut strip = Self::strip(channel, strip_id)?;
        strip
            .cut_boundaries
            .extend((strip.start_frame + period..strip.end_frame).step_by(period as usize));

        let mut working = channel.clone();
        working.update(strip)?;
        let group = Self::subcut(&mut working, strip_id)?;
        *channel = working;
        Ok(group)
    }

    /// Move the end frame of a tracked substrip
    pub fn extend(
        channel: &mut Channel,
        group: &SubstripGroup,
        strip_id: StripId,
        new_end_frame: Frame,
    ) -> Result<()> {
        group.require(strip_id)?;
        let mut strip = Self::strip(channel, strip_id)?;
        if new_end_frame <= strip.start_frame {
            return Err(SequencerError::EmptyWindow(format!(
                "end frame {} is not after start frame {}",
                new_end_frame, strip.start_frame
            )));
        }
        strip.set_length(new_end_frame - strip.start_frame);
        channel.update(strip)?;
        tracing::debug!("Extended strip {:?} to frame {}", strip_id, new_end_frame);
        Ok(())
    }

    /// Lift a substrip out of its group as an independent strip
    pub fn separate(channel: &mut Channel, group: &mut SubstripGroup, strip_id: StripId) -> Result<StripId> {
        group.require(strip_id)?;
        let mut strip = Self::strip(channel, strip_id)?;
        strip.cut_boundaries.clear();
        channel.update(strip)?;
        group.members.retain(|id| *id != strip_id);
        tracing::debug!("Separated strip {:?} from group of {:?}", strip_id, group.source);
        Ok(strip_id)
    }

    /// Remove every second substrip (indices 1, 3, 5, ...) and close the gaps.
    ///
    /// Every strip after a removed one shifts left by the total removed
    /// length before it, so the channel stays contiguous where it was.
    pub fn remove_every_other(channel: &mut Channel, group: &mut SubstripGroup) -> Result<Vec<StripId>> {
        if group.len() < 2 {
            return Err(SequencerError::InsufficientInput {
                required: 2,
                actual: group.len(),
            });
        }

        let mut members: Vec<Strip> = group
            .members
            .iter()
            .map(|id| Self::strip(channel, *id))
            .collect::<Result<_>>()?;
        members.sort_by_key(|s| s.start_frame);

        let removed: Vec<Strip> = members.into_iter().skip(1).step_by(2).collect();
        let removed_ids: Vec<StripId> = removed.iter().map(|s| s.id).collect();

        let kept: Vec<Strip> = channel
            .strips()
            .iter()
            .filter(|s| !removed_ids.contains(&s.id))
            .map(|s| {
                let shift: Frame = removed
                    .iter()
                    .filter(|r| r.end_frame <= s.start_frame)
                    .map(Strip::length)
                    .sum();
                let mut moved = s.clone();
                moved.translate(-shift);
                moved
            })
            .collect();

        let all_ids: Vec<StripId> = channel.strips().iter().map(|s| s.id).collect();
        channel.replace(&all_ids, kept)?;
        group.members.retain(|id| !removed_ids.contains(id));

        tracing::debug!(
            "Removed {} alternate substrips from group of {:?}",
            removed_ids.len(),
            group.source
        );
        Ok(removed_ids)
    }

    fn strip(channel: &Channel, strip_id: StripId) -> Result<Strip> {
        channel
            .get(strip_id)
            .cloned()
            .ok_or(SequencerError::StripNotFound(strip_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelId;
    use crate::strip::StripKind;

    fn channel_with(strips: &[(Frame, Frame)]) -> (Channel, Vec<StripId>) {
        let mut channel = Channel::new(ChannelId(1));
        let ids = strips
            .iter()
            .map(|&(start, end)| {
                channel
                    .insert(Strip::new("clip", StripKind::Movie, ChannelId(1), start, end))
                    .unwrap()
            })
            .collect();
        (channel, ids)
    }

    fn ranges(channel: &Channel) -> Vec<(Frame, Frame)> {
        channel.strips().iter().map(|s| (s.start_frame, s.end_frame)).collect()
    }

    #[test]
    fn test_split_records_boundary() {
        let (mut channel, ids) = channel_with(&[(0, 30)]);
        let (left, right) = StripEditor::split(&mut channel, ids[0], 12).unwrap();

        assert_eq!(left, ids[0]);
        assert_eq!(ranges(&channel), vec![(0, 12), (12, 30)]);
        assert!(channel.get(left).unwrap().cut_boundaries.contains(&12));
        assert!(channel.get(right).unwrap().cut_boundaries.contains(&12));
    }

    #[test]
    fn test_split_out_of_range() {
        let (mut channel, ids) = channel_with(&[(0, 30)]);
        for frame in [0, 30, -4, 45] {
            assert!(matches!(
                StripEditor::split(&mut channel, ids[0], frame),
                Err(SequencerError::OutOfRange { .. })
            ));
        }
        assert_eq!(ranges(&channel), vec![(0, 30)]);
    }

    #[test]
    fn test_merge_of_split_restores_range() {
        let (mut channel, ids) = channel_with(&[(5, 40)]);
        let (left, right) = StripEditor::split(&mut channel, ids[0], 17).unwrap();
        let merged = StripEditor::merge(&mut channel, left, right).unwrap();

        let strip = channel.get(merged).unwrap();
        assert_eq!((strip.start_frame, strip.end_frame), (5, 40));
        assert!(strip.cut_boundaries.contains(&17));
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn test_merge_not_adjacent() {
        let (mut channel, ids) = channel_with(&[(0, 10), (12, 20)]);
        assert_eq!(
            StripEditor::merge(&mut channel, ids[0], ids[1]),
            Err(SequencerError::NotAdjacent { left_end: 10, right_start: 12 })
        );
        assert_eq!(channel.len(), 2);
    }

    #[test]
    fn test_split_merge_sequences_keep_invariant() {
        let (mut channel, ids) = channel_with(&[(0, 100), (100, 140)]);
        let mut current = ids[0];
        for frame in [90, 70, 50, 30, 10] {
            let (left, _) = StripEditor::split(&mut channel, current, frame).unwrap();
            assert!(channel.validate());
            current = left;
        }
        while channel.len() > 1 {
            let first = channel.strips()[0].id;
            let second = channel.strips()[1].id;
            StripEditor::merge(&mut channel, first, second).unwrap();
            assert!(channel.validate());
        }
        assert_eq!(ranges(&channel), vec![(0, 140)]);
        let cuts: Vec<_> = channel.strips()[0].inner_cuts().collect();
        assert_eq!(cuts, vec![10, 30, 50, 70, 90, 100]);
    }

    #[test]
    fn test_subcut_recovers_cuts() {
        let mut channel = Channel::new(ChannelId(1));
        let id = channel
            .insert(Strip::new("take", StripKind::Movie, ChannelId(1), 0, 30).with_cuts([10, 20]))
            .unwrap();

        let group = StripEditor::subcut(&mut channel, id).unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.boundaries, vec![10, 20]);
        assert_eq!(ranges(&channel), vec![(0, 10), (10, 20), (20, 30)]);
        assert_eq!(channel.strips()[2].name, "take.002");
    }

    #[test]
    fn test_subcut_after_merge() {
        let (mut channel, ids) = channel_with(&[(0, 30)]);
        let (left, right) = StripEditor::split(&mut channel, ids[0], 10).unwrap();
        let (middle, rest) = StripEditor::split(&mut channel, right, 20).unwrap();
        let merged = StripEditor::merge(&mut channel, left, middle).unwrap();
        StripEditor::merge(&mut channel, merged, rest).unwrap();

        let group = StripEditor::subcut(&mut channel, merged).unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(ranges(&channel), vec![(0, 10), (10, 20), (20, 30)]);
    }

    #[test]
    fn test_extend_and_separate() {
        let mut channel = Channel::new(ChannelId(1));
        let id = channel
            .insert(Strip::new("take", StripKind::Movie, ChannelId(1), 0, 30).with_cuts([10, 20]))
            .unwrap();
        let mut group = StripEditor::subcut(&mut channel, id).unwrap();
        let last = group.members()[2];

        StripEditor::extend(&mut channel, &group, last, 45).unwrap();
        assert_eq!(channel.get(last).unwrap().end_frame, 45);

        let middle = group.members()[1];
        assert!(matches!(
            StripEditor::extend(&mut channel, &group, middle, 25),
            Err(SequencerError::Overlap { .. })
        ));

        StripEditor::separate(&mut channel, &mut group, middle).unwrap();
        assert!(!group.contains(middle));
        assert!(channel.get(middle).unwrap().cut_boundaries.is_empty());
        assert_eq!(
            StripEditor::extend(&mut channel, &group, middle, 19),
            Err(SequencerError::NotInGroup(middle))
        );
    }

    #[test]
    fn test_remove_every_other() {
        let (mut channel, ids) = channel_with(&[(0, 60), (60, 70)]);
        let mut group = StripEditor::cut_every(&mut channel, ids[0], 10).unwrap();
        assert_eq!(group.len(), 6);
        let members = group.members().to_vec();

        let removed = StripEditor::remove_every_other(&mut channel, &mut group).unwrap();
        assert_eq!(removed, vec![members[1], members[3], members[5]]);
        assert_eq!(group.members(), &[members[0], members[2], members[4]]);
        assert_eq!(ranges(&channel), vec![(0, 10), (10, 20), (20, 30), (30, 40)]);
        assert_eq!(channel.strips()[3].id, ids[1]);
    }

    #[test]
    fn test_cut_every_rejects_bad_period() {
        let (mut channel, ids) = channel_with(&[(0, 60)]);
        assert!(matches!(
            StripEditor::cut_every(&mut channel, ids[0], 0),
            Err(SequencerError::EmptyWindow(_))
        ));
        assert_eq!(channel.len(), 1);
    }
}
