// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation targets bound to host scene objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Host object ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    /// Create a new random object ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Vector component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X component
    X,
    /// Y component
    Y,
    /// Z component
    Z,
}

impl Axis {
    /// Component index
    pub fn index(&self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Path to an animatable property on an object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyPath {
    /// Location component
    Location(Axis),
    /// Euler rotation component
    Rotation(Axis),
    /// Scale component
    Scale(Axis),
    /// Shape key value
    ShapeKey(String),
    /// Material node parameter
    Material {
        /// Material slot index
        slot: usize,
        /// Parameter name
        parameter: String,
    },
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(axis) => write!(f, "location[{}]", axis.index()),
            Self::Rotation(axis) => write!(f, "rotation_euler[{}]", axis.index()),
            Self::Scale(axis) => write!(f, "scale[{}]", axis.index()),
            Self::ShapeKey(name) => write!(f, "key_blocks[\"{name}\"].value"),
            Self::Material { slot, parameter } => {
                write!(f, "material_slots[{slot}].inputs[\"{parameter}\"]")
            }
        }
    }
}

/// A property on a host object that keyframes are written to.
///
/// This only names the property. The host owns the object and may delete it
/// at any time, so existence is checked again on every operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimatableTarget {
    /// Target object
    pub object: ObjectId,
    /// Property on the object
    pub property: PropertyPath,
}

impl AnimatableTarget {
    /// Create a target
    pub fn new(object: ObjectId, property: PropertyPath) -> Self {
        Self { object, property }
    }

    /// Target a scale component
    pub fn scale(object: ObjectId, axis: Axis) -> Self {
        Self::new(object, PropertyPath::Scale(axis))
    }

    /// Target a shape key
    pub fn shape_key(object: ObjectId, name: impl Into<String>) -> Self {
        Self::new(object, PropertyPath::ShapeKey(name.into()))
    }
}

impl fmt::Display for AnimatableTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.object.0, self.property)
    }
}
