// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline editing and keyframe generation for Cutline.
//!
//! This crate provides procedural editing of a non-linear timeline:
//! - Channels of non-overlapping strips
//! - Split, merge, subcut, extend and every-other removal
//! - Seeded strip shuffling
//! - Popin, spike and offset keyframe curves
//! - Effect chains in captured selection order
//! - Strip catalogs for asset documentation
//!
//! ## Architecture
//!
//! The engine is built on:
//! - A [`SceneHost`] trait onto host-owned scene data
//! - Plain-value edits on copies of channels and curves
//! - One [`EditBatch`] commit per operation, so a failed edit writes nothing

pub mod binding;
pub mod catalog;
pub mod chain;
pub mod channel;
pub mod curve;
pub mod editor;
pub mod error;
pub mod host;
pub mod keyframe;
pub mod selection;
pub mod session;
pub mod settings;
pub mod shuffle;
pub mod strip;
pub mod timeline;

#[cfg(test)]
mod testing;

pub use binding::{AnimatableTarget, Axis, ObjectId, PropertyPath};
pub use catalog::{strip_duplicate_suffix, CatalogQuery, StripCatalog};
pub use chain::{ChainStep, EffectChain};
pub use channel::{Channel, ChannelId};
pub use curve::{CurveGenerator, EffectRecipe, EffectSpec};
pub use editor::{StripEditor, SubstripGroup};
pub use error::{Result, SequencerError};
pub use host::{EditBatch, SceneHost};
pub use keyframe::{Interpolation, InterpolationMode, KeyframeCurve, KeyframePoint};
pub use selection::SelectionSnapshot;
pub use session::Session;
pub use settings::{PopinSettings, SequencerSettings, SpikeSettings};
pub use shuffle::{DurationMode, ShuffleGenerator, ShufflePolicy};
pub use strip::{Frame, SourceRef, Strip, StripId, StripKind};
pub use timeline::Timeline;
