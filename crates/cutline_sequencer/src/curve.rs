// SPDX-License-Identifier: MIT OR Apache-2.0
//! Procedural keyframe curves.
//!
//! Recipes:
//! - Popin: start value, overshoot past the final value, settle on the final value
//! - Spike: base, peak, back to base, optionally repeated
//! - Offset: an existing curve replayed at another frame

use crate::binding::AnimatableTarget;
use crate::error::{Result, SequencerError};
use crate::host::SceneHost;
use crate::keyframe::{InterpolationMode, KeyframeCurve, KeyframePoint};
use crate::strip::Frame;
use serde::{Deserialize, Serialize};

/// Curve recipe with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectRecipe {
    /// Scale-overshoot-settle
    Popin {
        /// Value at the first key
        from: f32,
        /// Value the curve settles on
        to: f32,
        /// Overshoot past `to`, in percent of `to`
        overshoot_percent: f32,
        /// Frames from first key to last key
        duration: Frame,
        /// Frames from the overshoot key to the last key
        settle: Frame,
    },
    /// Momentary emphasis
    Spike {
        /// Resting value
        base: f32,
        /// Value at the top of each spike
        peak: f32,
        /// Frames covered by all spikes
        window: Frame,
        /// Number of spikes in the window
        count: u32,
    },
    /// Existing curve shifted in time by the spec's offset.
    ///
    /// The base keeps its own frames, so the spec's `start_frame` is ignored.
    Offset {
        /// Curve to replay
        base: KeyframeCurve,
    },
}

impl EffectRecipe {
    /// Recipe name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Popin { .. } => "popin",
            Self::Spike { .. } => "spike",
            Self::Offset { .. } => "offset",
        }
    }

    fn build(&self, start: Frame, offset: Frame) -> Result<KeyframeCurve> {
        match self {
            Self::Popin {
                from,
                to,
                overshoot_percent,
                duration,
                settle,
            } => {
                if *duration <= 0 || *settle <= 0 || settle >= duration {
                    return Err(SequencerError::EmptyWindow(format!(
                        "popin needs 0 < settle ({settle}) < duration ({duration})"
                    )));
                }
                let overshoot = to * (1.0 + overshoot_percent / 100.0);
                let end = start + duration;
                KeyframeCurve::from_points(vec![
                    KeyframePoint::new(start, *from).with_interpolation(InterpolationMode::Bezier),
                    KeyframePoint::new(end - settle, overshoot)
                        .with_interpolation(InterpolationMode::EaseOut),
                    KeyframePoint::new(end, *to),
                ])
            }
            Self::Spike {
                base,
                peak,
                window,
                count,
            } => {
                let count = Frame::from(*count);
                if count < 1 || *window < 2 * count {
                    return Err(SequencerError::EmptyWindow(format!(
                        "{count} spikes need at least {} frames, window is {window}",
                        2 * count.max(1)
                    )));
                }
                let mut curve = KeyframeCurve::new();
                curve.push(KeyframePoint::new(start, *base))?;
                for i in 0..count {
                    let from = start + i * window / count;
                    let until = start + (i + 1) * window / count;
                    curve.push(KeyframePoint::new(from + (until - from) / 2, *peak))?;
                    curve.push(KeyframePoint::new(until, *base))?;
                }
                Ok(curve)
            }
            Self::Offset { base } => {
                if base.is_empty() {
                    return Err(SequencerError::EmptyWindow(
                        "offset recipe has no keyframes to replay".to_string(),
                    ));
                }
                Ok(base.offset(offset))
            }
        }
    }
}

/// A named curve recipe placed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    /// Display name
    pub name: String,
    /// Recipe
    pub recipe: EffectRecipe,
    /// Frame of the first popin or spike key
    pub start_frame: Frame,
    /// Extra frames added to every key, for chaining
    pub offset: Option<Frame>,
}

impl EffectSpec {
    /// Create a spec named after its recipe
    pub fn new(recipe: EffectRecipe, start_frame: Frame) -> Self {
        Self {
            name: recipe.name().to_string(),
            recipe,
            start_frame,
            offset: None,
        }
    }

    /// Set the chaining offset
    pub fn with_offset(mut self, offset: Frame) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Frame of the first generated key including the offset
    pub fn effective_start(&self) -> Frame {
        self.start_frame + self.offset.unwrap_or(0)
    }
}

/// Keyframe curve generation
pub struct CurveGenerator;

impl CurveGenerator {
    /// Build the curve for a spec without touching any target
    pub fn curve(spec: &EffectSpec) -> Result<KeyframeCurve> {
        spec.recipe.build(spec.effective_start(), spec.offset.unwrap_or(0))
    }

    /// Build the curve for a target that must exist on the host
    pub fn generate<H: SceneHost + ?Sized>(
        host: &H,
        target: &AnimatableTarget,
        spec: &EffectSpec,
    ) -> Result<KeyframeCurve> {
        if !host.has_property(target) {
            return Err(SequencerError::InvalidTarget(target.clone()));
        }
        let curve = Self::curve(spec)?;
        tracing::debug!(
            "Generated {} keys of '{}' for {}",
            curve.len(),
            spec.name,
            target
        );
        Ok(curve)
    }

    /// Generate and merge into the target's existing keyframes
    pub fn merged<H: SceneHost + ?Sized>(
        host: &H,
        target: &AnimatableTarget,
        spec: &EffectSpec,
    ) -> Result<KeyframeCurve> {
        let generated = Self::generate(host, target, spec)?;
        let mut curve = host.curve(target).unwrap_or_default();
        curve.merge(&generated);
        Ok(curve)
    }

    /// Copy of a curve with every frame shifted
    pub fn chain_offset(base: &KeyframeCurve, offset: Frame) -> KeyframeCurve {
        base.offset(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn popin(overshoot_percent: f32, duration: Frame, settle: Frame) -> EffectRecipe {
        EffectRecipe::Popin {
            from: 0.0,
            to: 1.0,
            overshoot_percent,
            duration,
            settle,
        }
    }

    #[test]
    fn test_popin_overshoot_and_settle() {
        let spec = EffectSpec::new(popin(20.0, 12, 4), 10).with_name("title popin");
        assert_eq!(spec.name, "title popin");
        let curve = CurveGenerator::curve(&spec).unwrap();
        let points = curve.points();

        assert_eq!(points.len(), 3);
        assert_eq!((points[0].frame, points[0].value), (10, 0.0));
        assert_eq!(points[1].frame, 18);
        assert!((points[1].value - 1.2).abs() < 1e-6);
        assert_eq!(points[1].interpolation, InterpolationMode::EaseOut);
        assert_eq!((points[2].frame, points[2].value), (22, 1.0));
    }

    #[test]
    fn test_popin_empty_window() {
        for (duration, settle) in [(0, 0), (-3, 1), (6, 0), (6, 6), (6, 9)] {
            let spec = EffectSpec::new(popin(20.0, duration, settle), 0);
            assert!(matches!(
                CurveGenerator::curve(&spec),
                Err(SequencerError::EmptyWindow(_))
            ));
        }
    }

    #[test]
    fn test_spike_keys() {
        let spec = EffectSpec::new(
            EffectRecipe::Spike {
                base: 0.0,
                peak: 1.0,
                window: 6,
                count: 1,
            },
            30,
        );
        let curve = CurveGenerator::curve(&spec).unwrap();
        let keys: Vec<_> = curve.points().iter().map(|p| (p.frame, p.value)).collect();
        assert_eq!(keys, vec![(30, 0.0), (33, 1.0), (36, 0.0)]);
    }

    #[test]
    fn test_repeated_spikes() {
        let spec = EffectSpec::new(
            EffectRecipe::Spike {
                base: 0.2,
                peak: 0.8,
                window: 12,
                count: 3,
            },
            0,
        );
        let curve = CurveGenerator::curve(&spec).unwrap();
        let frames: Vec<_> = curve.points().iter().map(|p| p.frame).collect();
        assert_eq!(frames, vec![0, 2, 4, 6, 8, 10, 12]);
    }

    #[test]
    fn test_spike_window_too_small() {
        let spec = EffectSpec::new(
            EffectRecipe::Spike {
                base: 0.0,
                peak: 1.0,
                window: 3,
                count: 2,
            },
            0,
        );
        assert!(matches!(
            CurveGenerator::curve(&spec),
            Err(SequencerError::EmptyWindow(_))
        ));
    }

    #[test]
    fn test_offset_recipe_shifts_base_frames() {
        let base = CurveGenerator::curve(&EffectSpec::new(popin(10.0, 8, 2), 10)).unwrap();
        assert_eq!(base.first_frame(), Some(10));

        let spec = EffectSpec::new(EffectRecipe::Offset { base: base.clone() }, 40).with_offset(5);
        let shifted = CurveGenerator::curve(&spec).unwrap();

        assert_eq!(shifted.first_frame(), Some(15));
        assert_eq!(shifted.last_frame(), Some(23));
        assert_eq!(shifted, CurveGenerator::chain_offset(&base, 5));
        let values: Vec<_> = shifted.points().iter().map(|p| p.value).collect();
        let original: Vec<_> = base.points().iter().map(|p| p.value).collect();
        assert_eq!(values, original);
    }

    #[test]
    fn test_offset_recipe_without_offset_keeps_frames() {
        let base = KeyframeCurve::from_points(vec![KeyframePoint::new(7, 0.0), KeyframePoint::new(9, 1.0)]).unwrap();
        let spec = EffectSpec::new(EffectRecipe::Offset { base: base.clone() }, 100);
        assert_eq!(CurveGenerator::curve(&spec).unwrap(), base);
    }

    #[test]
    fn test_offset_of_empty_curve() {
        let spec = EffectSpec::new(EffectRecipe::Offset { base: KeyframeCurve::new() }, 0);
        assert!(matches!(
            CurveGenerator::curve(&spec),
            Err(SequencerError::EmptyWindow(_))
        ));
    }
}
