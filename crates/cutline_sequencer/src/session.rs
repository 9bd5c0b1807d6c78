// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host-level editing session.
//!
//! Each method reads what it needs from the host, runs the edit on copies,
//! and commits a single [`EditBatch`]. A failed edit commits nothing.

use crate::binding::{AnimatableTarget, PropertyPath};
use crate::chain::EffectChain;
use crate::channel::{Channel, ChannelId};
use crate::curve::{CurveGenerator, EffectSpec};
use crate::editor::{StripEditor, SubstripGroup};
use crate::error::{Result, SequencerError};
use crate::host::{EditBatch, SceneHost};
use crate::keyframe::KeyframeCurve;
use crate::selection::SelectionSnapshot;
use crate::shuffle::{ShuffleGenerator, ShufflePolicy};
use crate::strip::{Frame, StripId};

/// Editing session over a host
pub struct Session<'h, H: SceneHost + ?Sized> {
    host: &'h mut H,
}

impl<'h, H: SceneHost + ?Sized> Session<'h, H> {
    /// Start a session
    pub fn new(host: &'h mut H) -> Self {
        Self { host }
    }

    /// Read access to the host
    pub fn host(&self) -> &H {
        &*self.host
    }

    /// Split a strip
    pub fn split(&mut self, channel: ChannelId, strip: StripId, at_frame: Frame) -> Result<(StripId, StripId)> {
        self.edit_channel(channel, "Split Strip", None, |c| StripEditor::split(c, strip, at_frame))
    }

    /// Merge two adjacent strips
    pub fn merge(&mut self, channel: ChannelId, left: StripId, right: StripId) -> Result<StripId> {
        self.edit_channel(channel, "Merge Strips", None, |c| StripEditor::merge(c, left, right))
    }

    /// Subcut a strip at its recorded cuts
    pub fn subcut(&mut self, channel: ChannelId, strip: StripId) -> Result<SubstripGroup> {
        self.edit_channel(channel, "Subcut Strip", None, |c| StripEditor::subcut(c, strip))
    }

    /// Cut a strip every `period` frames
    pub fn cut_every(&mut self, channel: ChannelId, strip: StripId, period: Frame) -> Result<SubstripGroup> {
        self.edit_channel(channel, "Cut Every", None, |c| StripEditor::cut_every(c, strip, period))
    }

    /// Extend a substrip
    pub fn extend(
        &mut self,
        channel: ChannelId,
        group: &SubstripGroup,
        strip: StripId,
        new_end_frame: Frame,
    ) -> Result<()> {
        self.edit_channel(channel, "Extend Substrip", None, |c| {
            StripEditor::extend(c, group, strip, new_end_frame)
        })
    }

    /// Separate a substrip from its group
    pub fn separate(&mut self, channel: ChannelId, group: &mut SubstripGroup, strip: StripId) -> Result<StripId> {
        let mut working = group.clone();
        let separated = self.edit_channel(channel, "Separate Substrip", None, |c| {
            StripEditor::separate(c, &mut working, strip)
        })?;
        *group = working;
        Ok(separated)
    }

    /// Remove every other substrip and close the gaps
    pub fn remove_every_other(&mut self, channel: ChannelId, group: &mut SubstripGroup) -> Result<Vec<StripId>> {
        let mut working = group.clone();
        let removed = self.edit_channel(channel, "Remove Every Other", None, |c| {
            StripEditor::remove_every_other(c, &mut working)
        })?;
        *group = working;
        Ok(removed)
    }

    /// Shuffle strips, keeping the object selection as it was
    pub fn shuffle(
        &mut self,
        channel: ChannelId,
        strips: &[StripId],
        policy: &ShufflePolicy,
        seed: Option<u64>,
    ) -> Result<Vec<StripId>> {
        let selection = SelectionSnapshot::capture(&*self.host);
        self.edit_channel(channel, "Shuffle Strips", Some(selection), |c| {
            ShuffleGenerator::shuffle(c, strips, policy, seed)
        })
    }

    /// Generate an effect on one target, merged into its existing keys
    pub fn generate(&mut self, target: &AnimatableTarget, spec: &EffectSpec) -> Result<KeyframeCurve> {
        let result = CurveGenerator::merged(&*self.host, target, spec).and_then(|curve| {
            let batch = EditBatch::new(format!("Generate {}", spec.name)).with_curve(target.clone(), curve.clone());
            self.host.commit(batch)?;
            Ok(curve)
        });
        if let Err(err) = &result {
            tracing::warn!("Generate {} rolled back: {}", spec.name, err);
        }
        result
    }

    /// Apply an effect chain and restore its captured selection order
    pub fn chain(&mut self, chain: &EffectChain) -> Result<Vec<AnimatableTarget>> {
        let result = chain.compose_merged(&*self.host).and_then(|curves| {
            let targets: Vec<AnimatableTarget> = curves.iter().map(|(t, _)| t.clone()).collect();
            let mut batch = EditBatch::new("Chain Effects").with_selection(chain.order().ids().to_vec());
            batch.curves = curves;
            self.host.commit(batch)?;
            Ok(targets)
        });
        if let Err(err) = &result {
            tracing::warn!("Chain of {} steps rolled back: {}", chain.steps().len(), err);
        }
        result
    }

    /// Capture the current selection and chain one effect over it
    pub fn chain_selection(
        &mut self,
        property: PropertyPath,
        spec: EffectSpec,
        step_offset: Frame,
    ) -> Result<Vec<AnimatableTarget>> {
        let selection = SelectionSnapshot::capture(&*self.host);
        let chain = EffectChain::from_selection(&selection, property, spec, step_offset);
        self.chain(&chain)
    }

    fn edit_channel<T>(
        &mut self,
        channel_id: ChannelId,
        label: &str,
        selection: Option<SelectionSnapshot>,
        edit: impl FnOnce(&mut Channel) -> Result<T>,
    ) -> Result<T> {
        let result = self
            .host
            .channel(channel_id)
            .ok_or(SequencerError::ChannelNotFound(channel_id))
            .and_then(|mut channel| {
                let value = edit(&mut channel)?;
                let mut batch = EditBatch::new(label).with_channel(channel);
                if let Some(selection) = selection {
                    batch = batch.with_selection(selection.into_ids());
                }
                self.host.commit(batch)?;
                Ok(value)
            });

        if let Err(err) = &result {
            tracing::warn!("{} on channel {} rolled back: {}", label, channel_id, err);
        }
        result
    }
}
