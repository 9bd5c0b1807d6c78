// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for animation curves.

use crate::error::{Result, SequencerError};
use crate::strip::Frame;
use serde::{Deserialize, Serialize};

/// Interpolation mode between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Constant (step)
    Constant,
    /// Linear interpolation
    #[default]
    Linear,
    /// Cubic bezier with flat handles
    Bezier,
    /// Slow start
    EaseIn,
    /// Slow finish
    EaseOut,
    /// Slow start and finish
    EaseInOut,
}

/// A keyframe on a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyframePoint {
    /// Frame of the keyframe
    pub frame: Frame,
    /// Value at this keyframe
    pub value: f32,
    /// Interpolation mode to next keyframe
    pub interpolation: InterpolationMode,
}

impl KeyframePoint {
    /// Create a new keyframe
    pub fn new(frame: Frame, value: f32) -> Self {
        Self {
            frame,
            value,
            interpolation: InterpolationMode::Linear,
        }
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Cubic bezier interpolation
    pub fn bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        p0 * mt3 + 3.0 * p1 * mt2 * t + 3.0 * p2 * mt * t2 + p3 * t3
    }

    /// Remap a segment parameter through an interpolation mode
    pub fn ease(mode: InterpolationMode, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match mode {
            InterpolationMode::Constant => 0.0,
            InterpolationMode::Linear => t,
            InterpolationMode::Bezier => Self::bezier(0.0, 0.0, 1.0, 1.0, t),
            InterpolationMode::EaseIn => t * t,
            InterpolationMode::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            InterpolationMode::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Keyframes for one animation target, frames strictly increasing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyframeCurve {
    points: Vec<KeyframePoint>,
}

impl KeyframeCurve {
    /// Create an empty curve
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a curve from points that must already be in strictly increasing frame order
    pub fn from_points(points: Vec<KeyframePoint>) -> Result<Self> {
        if let Some(pair) = points.windows(2).find(|pair| pair[1].frame <= pair[0].frame) {
            return Err(SequencerError::UnorderedKeyframes {
                previous: pair[0].frame,
                frame: pair[1].frame,
            });
        }
        Ok(Self { points })
    }

    /// Append a keyframe after the last one
    pub fn push(&mut self, point: KeyframePoint) -> Result<()> {
        if let Some(last) = self.points.last() {
            if point.frame <= last.frame {
                return Err(SequencerError::UnorderedKeyframes {
                    previous: last.frame,
                    frame: point.frame,
                });
            }
        }
        self.points.push(point);
        Ok(())
    }

    /// Insert or update keyframe at its frame
    pub fn set(&mut self, point: KeyframePoint) {
        match self.points.binary_search_by_key(&point.frame, |p| p.frame) {
            Ok(idx) => self.points[idx] = point,
            Err(idx) => self.points.insert(idx, point),
        }
    }

    /// Write another curve's keyframes over this one.
    ///
    /// Keys at frames the other curve does not touch are kept.
    pub fn merge(&mut self, other: &KeyframeCurve) {
        for point in &other.points {
            self.set(*point);
        }
    }

    /// Copy of this curve with every frame shifted by `delta`
    pub fn offset(&self, delta: Frame) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| KeyframePoint {
                    frame: p.frame + delta,
                    ..*p
                })
                .collect(),
        }
    }

    /// Remove keyframe at frame
    pub fn remove(&mut self, frame: Frame) -> Option<KeyframePoint> {
        let idx = self.points.binary_search_by_key(&frame, |p| p.frame).ok()?;
        Some(self.points.remove(idx))
    }

    /// Get keyframe at frame (if exists)
    pub fn point_at(&self, frame: Frame) -> Option<&KeyframePoint> {
        self.points
            .binary_search_by_key(&frame, |p| p.frame)
            .ok()
            .map(|idx| &self.points[idx])
    }

    /// Get keyframes in a frame range (inclusive)
    pub fn points_in_range(&self, start: Frame, end: Frame) -> &[KeyframePoint] {
        let lo = self.points.partition_point(|p| p.frame < start);
        let hi = self.points.partition_point(|p| p.frame <= end);
        &self.points[lo..hi.max(lo)]
    }

    /// Evaluate the curve at a (possibly fractional) frame
    pub fn evaluate(&self, frame: f32) -> Option<f32> {
        let first = self.points.first()?;
        let next_idx = self.points.iter().position(|p| p.frame as f32 >= frame);

        match next_idx {
            None => self.points.last().map(|p| p.value),
            Some(0) => Some(first.value),
            Some(idx) => {
                let a = &self.points[idx - 1];
                let b = &self.points[idx];
                if b.frame as f32 == frame {
                    return Some(b.value);
                }
                if a.interpolation == InterpolationMode::Constant {
                    return Some(a.value);
                }
                let t = (frame - a.frame as f32) / (b.frame - a.frame) as f32;
                Some(Interpolation::lerp(
                    a.value,
                    b.value,
                    Interpolation::ease(a.interpolation, t),
                ))
            }
        }
    }

    /// Get all keyframes
    pub fn points(&self) -> &[KeyframePoint] {
        &self.points
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether the curve has no keyframes
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Frame of the first keyframe
    pub fn first_frame(&self) -> Option<Frame> {
        self.points.first().map(|p| p.frame)
    }

    /// Frame of the last keyframe
    pub fn last_frame(&self) -> Option<Frame> {
        self.points.last().map(|p| p.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_rejects_unordered() {
        let points = vec![KeyframePoint::new(0, 0.0), KeyframePoint::new(0, 1.0)];
        assert_eq!(
            KeyframeCurve::from_points(points),
            Err(SequencerError::UnorderedKeyframes { previous: 0, frame: 0 })
        );
    }

    #[test]
    fn test_set_replaces_same_frame() {
        let mut curve = KeyframeCurve::new();
        curve.set(KeyframePoint::new(10, 1.0));
        curve.set(KeyframePoint::new(0, 0.0));
        curve.set(KeyframePoint::new(10, 2.0));

        assert_eq!(curve.len(), 2);
        assert_eq!(curve.point_at(10).map(|p| p.value), Some(2.0));
        assert_eq!(curve.first_frame(), Some(0));

        assert_eq!(curve.remove(10).map(|p| p.value), Some(2.0));
        assert!(curve.remove(10).is_none());
        assert_eq!(curve.last_frame(), Some(0));
    }

    #[test]
    fn test_merge_keeps_untouched_keys() {
        let mut existing = KeyframeCurve::from_points(vec![
            KeyframePoint::new(0, 5.0),
            KeyframePoint::new(50, 6.0),
        ])
        .unwrap();
        let generated = KeyframeCurve::from_points(vec![
            KeyframePoint::new(0, 0.0),
            KeyframePoint::new(10, 1.0),
        ])
        .unwrap();

        existing.merge(&generated);
        let frames: Vec<_> = existing.points().iter().map(|p| (p.frame, p.value)).collect();
        assert_eq!(frames, vec![(0, 0.0), (10, 1.0), (50, 6.0)]);
    }

    #[test]
    fn test_evaluate_linear_and_constant() {
        let curve = KeyframeCurve::from_points(vec![
            KeyframePoint::new(0, 0.0),
            KeyframePoint::new(10, 1.0).with_interpolation(InterpolationMode::Constant),
            KeyframePoint::new(20, 3.0),
        ])
        .unwrap();

        assert_eq!(curve.evaluate(-5.0), Some(0.0));
        assert!((curve.evaluate(5.0).unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(curve.evaluate(15.0), Some(1.0));
        assert_eq!(curve.evaluate(40.0), Some(3.0));
        assert_eq!(KeyframeCurve::new().evaluate(0.0), None);
    }

    #[test]
    fn test_ease_endpoints() {
        for mode in [
            InterpolationMode::Linear,
            InterpolationMode::Bezier,
            InterpolationMode::EaseIn,
            InterpolationMode::EaseOut,
            InterpolationMode::EaseInOut,
        ] {
            assert!(Interpolation::ease(mode, 0.0).abs() < 1e-6);
            assert!((Interpolation::ease(mode, 1.0) - 1.0).abs() < 1e-6);
        }
        assert!(Interpolation::ease(InterpolationMode::EaseOut, 0.5) > 0.5);
    }

    #[test]
    fn test_points_in_range() {
        let curve = KeyframeCurve::from_points(vec![
            KeyframePoint::new(0, 0.0),
            KeyframePoint::new(5, 1.0),
            KeyframePoint::new(10, 0.0),
        ])
        .unwrap();
        assert_eq!(curve.points_in_range(1, 10).len(), 2);
        assert!(curve.points_in_range(11, 20).is_empty());
    }
}
