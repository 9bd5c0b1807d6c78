// SPDX-License-Identifier: MIT OR Apache-2.0
//! Effect chains across several objects.
//!
//! Step `i` of a chain is generated `i * step_offset` frames after the first
//! step, in the order the steps were given. The object order is captured when
//! the chain is built and committed back as the selection; the host selection
//! is never consulted again.

use crate::binding::{AnimatableTarget, PropertyPath};
use crate::curve::{CurveGenerator, EffectSpec};
use crate::error::{Result, SequencerError};
use crate::host::SceneHost;
use crate::keyframe::KeyframeCurve;
use crate::selection::SelectionSnapshot;
use crate::strip::Frame;
use indexmap::IndexMap;

/// One target and the effect it receives
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStep {
    /// Target property
    pub target: AnimatableTarget,
    /// Effect for this target
    pub spec: EffectSpec,
}

/// An ordered effect chain
#[derive(Debug, Clone)]
pub struct EffectChain {
    steps: Vec<ChainStep>,
    order: SelectionSnapshot,
    step_offset: Frame,
}

impl EffectChain {
    /// Chain the given steps in list order
    pub fn new(steps: Vec<(AnimatableTarget, EffectSpec)>, step_offset: Frame) -> Self {
        let steps: Vec<ChainStep> = steps
            .into_iter()
            .map(|(target, spec)| ChainStep { target, spec })
            .collect();
        let order = SelectionSnapshot::from_ids(steps.iter().map(|s| s.target.object));
        Self {
            steps,
            order,
            step_offset,
        }
    }

    /// Chain one effect over every object of a captured selection
    pub fn from_selection(
        selection: &SelectionSnapshot,
        property: PropertyPath,
        spec: EffectSpec,
        step_offset: Frame,
    ) -> Self {
        let steps = selection
            .ids()
            .iter()
            .map(|object| ChainStep {
                target: AnimatableTarget::new(*object, property.clone()),
                spec: spec.clone(),
            })
            .collect();
        Self {
            steps,
            order: selection.clone(),
            step_offset,
        }
    }

    /// Steps in chaining order
    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    /// Object order captured when the chain was built, restored on commit
    pub fn order(&self) -> &SelectionSnapshot {
        &self.order
    }

    /// Frames between consecutive steps
    pub fn step_offset(&self) -> Frame {
        self.step_offset
    }

    /// Generate one curve per step.
    ///
    /// Fails on the first missing target or degenerate window, in which case
    /// no curves are returned.
    pub fn compose<H: SceneHost + ?Sized>(&self, host: &H) -> Result<Vec<(AnimatableTarget, KeyframeCurve)>> {
        if self.steps.is_empty() {
            return Err(SequencerError::InsufficientInput {
                required: 1,
                actual: 0,
            });
        }

        let mut curves = Vec::with_capacity(self.steps.len());
        let mut offset: Frame = 0;
        for step in &self.steps {
            let spec = step
                .spec
                .clone()
                .with_offset(step.spec.offset.unwrap_or(0) + offset);
            let curve = CurveGenerator::generate(host, &step.target, &spec)?;
            curves.push((step.target.clone(), curve));
            offset += self.step_offset;
        }

        tracing::debug!(
            "Composed chain of {} steps, {} frames apart",
            curves.len(),
            self.step_offset
        );
        Ok(curves)
    }

    /// Generate every step and merge it into the targets' existing keyframes
    pub fn compose_merged<H: SceneHost + ?Sized>(&self, host: &H) -> Result<Vec<(AnimatableTarget, KeyframeCurve)>> {
        let generated = self.compose(host)?;

        let mut merged: IndexMap<AnimatableTarget, KeyframeCurve> = IndexMap::new();
        for (target, curve) in generated {
            merged
                .entry(target)
                .or_insert_with_key(|target| host.curve(target).unwrap_or_default())
                .merge(&curve);
        }
        Ok(merged.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Axis, ObjectId};
    use crate::curve::EffectRecipe;
    use crate::testing::MemoryHost;

    fn spike() -> EffectSpec {
        EffectSpec::new(
            EffectRecipe::Spike {
                base: 0.0,
                peak: 1.0,
                window: 4,
                count: 1,
            },
            20,
        )
    }

    #[test]
    fn test_offsets_accumulate_in_list_order() {
        let mut host = MemoryHost::default();
        let a = host.add_object(ObjectId::new());
        let b = host.add_object(ObjectId::new());
        let c = host.add_object(ObjectId::new());

        let chain = EffectChain::new(
            vec![
                (AnimatableTarget::shape_key(c, "Smile"), spike()),
                (AnimatableTarget::shape_key(a, "Smile"), spike().with_offset(2)),
                (AnimatableTarget::shape_key(b, "Smile"), spike()),
            ],
            3,
        );
        let curves = chain.compose(&host).unwrap();

        let starts: Vec<_> = curves
            .iter()
            .map(|(t, curve)| (t.object, curve.first_frame().unwrap()))
            .collect();
        assert_eq!(starts, vec![(c, 20), (a, 25), (b, 26)]);
        assert_eq!(chain.order().ids(), &[c, a, b]);
    }

    #[test]
    fn test_repeated_object_keeps_step_order() {
        let mut host = MemoryHost::default();
        let a = host.add_object(ObjectId::new());
        let b = host.add_object(ObjectId::new());

        let chain = EffectChain::new(
            vec![
                (AnimatableTarget::scale(a, Axis::X), spike()),
                (AnimatableTarget::scale(b, Axis::X), spike()),
                (AnimatableTarget::scale(a, Axis::Y), spike()),
            ],
            5,
        );
        let curves = chain.compose(&host).unwrap();

        let starts: Vec<_> = curves
            .iter()
            .map(|(t, curve)| (t.clone(), curve.first_frame().unwrap()))
            .collect();
        assert_eq!(
            starts,
            vec![
                (AnimatableTarget::scale(a, Axis::X), 20),
                (AnimatableTarget::scale(b, Axis::X), 25),
                (AnimatableTarget::scale(a, Axis::Y), 30),
            ]
        );
        assert_eq!(chain.order().ids(), &[a, b]);
    }

    #[test]
    fn test_empty_chain() {
        let host = MemoryHost::default();
        let chain = EffectChain::new(Vec::new(), 5);
        assert_eq!(
            chain.compose(&host),
            Err(SequencerError::InsufficientInput { required: 1, actual: 0 })
        );
    }

    #[test]
    fn test_merged_keeps_existing_keys() {
        let mut host = MemoryHost::default();
        let a = host.add_object(ObjectId::new());
        let target = AnimatableTarget::scale(a, Axis::Z);
        let mut existing = KeyframeCurve::new();
        existing.set(crate::keyframe::KeyframePoint::new(100, 3.0));
        host.curves.insert(target.clone(), existing);

        let chain = EffectChain::new(vec![(target.clone(), spike())], 5);
        let merged = chain.compose_merged(&host).unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].1.len(), 4);
        assert_eq!(merged[0].1.point_at(100).map(|p| p.value), Some(3.0));
    }
}
