// SPDX-License-Identifier: MIT OR Apache-2.0
//! Randomized reordering and re-lengthing of strips.
//!
//! Used for typing and background-chatter edits where a run of short clips
//! should play back in a different order with varied lengths. All randomness
//! comes from the caller's RNG or an explicit seed.

use crate::channel::Channel;
use crate::error::{Result, SequencerError};
use crate::selection::SelectionSnapshot;
use crate::strip::{Frame, Strip, StripId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How new strip lengths relate to the original run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DurationMode {
    /// New lengths add up to the original total
    #[default]
    PreserveDuration,
    /// Each length is drawn independently
    Free,
}

/// Length bounds for shuffled strips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShufflePolicy {
    /// Shortest allowed strip
    pub min_length: Frame,
    /// Longest allowed strip
    pub max_length: Frame,
    /// Total duration handling
    pub mode: DurationMode,
}

impl ShufflePolicy {
    /// Create a duration-preserving policy
    pub fn preserving(min_length: Frame, max_length: Frame) -> Self {
        Self {
            min_length,
            max_length,
            mode: DurationMode::PreserveDuration,
        }
    }

    /// Create a free-length policy
    pub fn free(min_length: Frame, max_length: Frame) -> Self {
        Self {
            min_length,
            max_length,
            mode: DurationMode::Free,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.min_length < 1 {
            return Err(SequencerError::InvalidPolicy(format!(
                "minimum length {} must be at least one frame",
                self.min_length
            )));
        }
        if self.max_length < self.min_length {
            return Err(SequencerError::InvalidPolicy(format!(
                "maximum length {} is below minimum length {}",
                self.max_length, self.min_length
            )));
        }
        Ok(())
    }
}

/// Strip shuffling
pub struct ShuffleGenerator;

impl ShuffleGenerator {
    /// Shuffle strips with an optional seed.
    ///
    /// `None` draws from the thread-local RNG.
    pub fn shuffle(
        channel: &mut Channel,
        strips: &[StripId],
        policy: &ShufflePolicy,
        seed: Option<u64>,
    ) -> Result<Vec<StripId>> {
        match seed {
            Some(seed) => Self::shuffle_with(channel, strips, policy, &mut StdRng::seed_from_u64(seed)),
            None => Self::shuffle_with(channel, strips, policy, &mut rand::thread_rng()),
        }
    }

    /// Shuffle strips drawing from `rng`.
    ///
    /// The strips are permuted, given new lengths within the policy bounds and
    /// laid back-to-back from the earliest original start frame. Returns the
    /// new order. On any error the channel is untouched.
    pub fn shuffle_with<R: Rng + ?Sized>(
        channel: &mut Channel,
        strips: &[StripId],
        policy: &ShufflePolicy,
        rng: &mut R,
    ) -> Result<Vec<StripId>> {
        let snapshot = SelectionSnapshot::from_ids(strips.iter().copied());
        if snapshot.len() < 2 {
            return Err(SequencerError::InsufficientInput {
                required: 2,
                actual: snapshot.len(),
            });
        }
        policy.validate()?;

        let originals: Vec<Strip> = snapshot
            .ids()
            .iter()
            .map(|id| {
                channel
                    .get(*id)
                    .cloned()
                    .ok_or(SequencerError::StripNotFound(*id))
            })
            .collect::<Result<_>>()?;
        let start = originals.iter().map(|s| s.start_frame).min().unwrap_or(0);
        let total: Frame = originals.iter().map(Strip::length).sum();

        let mut order = snapshot.ids().to_vec();
        order.shuffle(rng);
        let lengths = Self::draw_lengths(order.len(), total, policy, rng)?;

        let mut cursor = start;
        let mut laid = Vec::with_capacity(order.len());
        for (id, length) in order.iter().zip(lengths) {
            let Some(idx) = snapshot.index_of(*id) else {
                return Err(SequencerError::StripNotFound(*id));
            };
            let Some(end) = cursor.checked_add(length) else {
                return Err(SequencerError::InvalidPolicy(format!(
                    "strip of {length} frames starting at {cursor} runs past the last frame"
                )));
            };
            let mut strip = originals[idx].clone();
            strip.translate(cursor - strip.start_frame);
            strip.set_length(length);
            cursor = end;
            laid.push(strip);
        }

        channel.replace(snapshot.ids(), laid)?;
        tracing::debug!(
            "Shuffled {} strips on channel {} over frames {}..{}",
            order.len(),
            channel.id,
            start,
            cursor
        );
        Ok(order)
    }

    fn draw_lengths<R: Rng + ?Sized>(
        count: usize,
        total: Frame,
        policy: &ShufflePolicy,
        rng: &mut R,
    ) -> Result<Vec<Frame>> {
        let (min, max) = (policy.min_length, policy.max_length);

        if policy.mode == DurationMode::Free {
            return Ok((0..count).map(|_| rng.gen_range(min..=max)).collect());
        }

        let n = count as Frame;
        let too_short = n.checked_mul(max).is_some_and(|longest| total > longest);
        let too_long = n.checked_mul(min).map_or(true, |shortest| total < shortest);
        if too_short || too_long {
            return Err(SequencerError::InvalidPolicy(format!(
                "{count} strips of {min}..={max} frames cannot add up to {total}"
            )));
        }

        let mut remaining = total;
        let mut lengths = Vec::with_capacity(count);
        for i in 0..count {
            let rest = (count - i - 1) as Frame;
            let lo = min.max(remaining.saturating_sub(rest.saturating_mul(max)));
            let hi = max.min(remaining.saturating_sub(rest.saturating_mul(min)));
            let length = rng.gen_range(lo..=hi);
            lengths.push(length);
            remaining -= length;
        }
        Ok(lengths)
    }
}
