// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine defaults.
//!
//! Settings are stored as RON:
//!
//! ```ron
//! SequencerSettings(
//!     version: 1,
//!     popin: PopinSettings(overshoot_percent: 20.0, duration: 12, settle: 4),
//!     spike: SpikeSettings(window: 6, peak: 1.0, count: 1),
//!     chain_step_offset: 5,
//!     shuffle: ShufflePolicy(min_length: 1, max_length: 48, mode: PreserveDuration),
//!     every_other_period: 1,
//! )
//! ```

use crate::channel::Channel;
use crate::curve::EffectRecipe;
use crate::editor::{StripEditor, SubstripGroup};
use crate::error::{Result, SequencerError};
use crate::shuffle::{DurationMode, ShufflePolicy};
use crate::strip::{Frame, StripId};
use serde::{Deserialize, Serialize};

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Popin defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopinSettings {
    /// Overshoot past the final value, in percent
    pub overshoot_percent: f32,
    /// Frames from first to last key
    pub duration: Frame,
    /// Frames from overshoot to last key
    pub settle: Frame,
}

impl Default for PopinSettings {
    fn default() -> Self {
        Self {
            overshoot_percent: 20.0,
            duration: 12,
            settle: 4,
        }
    }
}

/// Spike defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeSettings {
    /// Frames covered by the spikes
    pub window: Frame,
    /// Peak value
    pub peak: f32,
    /// Spikes per window
    pub count: u32,
}

impl Default for SpikeSettings {
    fn default() -> Self {
        Self {
            window: 6,
            peak: 1.0,
            count: 1,
        }
    }
}

/// Sequencer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerSettings {
    /// Format version
    pub version: u32,
    /// Popin defaults
    pub popin: PopinSettings,
    /// Spike defaults
    pub spike: SpikeSettings,
    /// Frames between chained effects
    pub chain_step_offset: Frame,
    /// Default shuffle bounds
    pub shuffle: ShufflePolicy,
    /// Period used when cutting burst captures for every-other removal
    pub every_other_period: Frame,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            popin: PopinSettings::default(),
            spike: SpikeSettings::default(),
            chain_step_offset: 5,
            shuffle: ShufflePolicy {
                min_length: 1,
                max_length: 48,
                mode: DurationMode::PreserveDuration,
            },
            every_other_period: 1,
        }
    }
}

impl SequencerSettings {
    /// Parse settings from RON
    pub fn from_ron(content: &str) -> Result<Self> {
        let settings: Self =
            ron::from_str(content).map_err(|e| SequencerError::Settings(e.to_string()))?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SequencerError::Settings(format!(
                "settings version {} is newer than supported version {}",
                settings.version, SETTINGS_FORMAT_VERSION
            )));
        }
        Ok(settings)
    }

    /// Write settings as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        ron::ser::to_string_pretty(self, config).map_err(|e| SequencerError::Settings(e.to_string()))
    }

    /// Popin recipe from `from` to `to` with the default timing
    pub fn popin(&self, from: f32, to: f32) -> EffectRecipe {
        EffectRecipe::Popin {
            from,
            to,
            overshoot_percent: self.popin.overshoot_percent,
            duration: self.popin.duration,
            settle: self.popin.settle,
        }
    }

    /// Spike recipe resting at `base`
    pub fn spike(&self, base: f32) -> EffectRecipe {
        EffectRecipe::Spike {
            base,
            peak: self.spike.peak,
            window: self.spike.window,
            count: self.spike.count,
        }
    }

    /// Default shuffle policy
    pub fn shuffle_policy(&self) -> ShufflePolicy {
        self.shuffle
    }

    /// Cut a burst capture into substrips of the default period, ready for
    /// every-other removal
    pub fn cut_burst(&self, channel: &mut Channel, strip: StripId) -> Result<SubstripGroup> {
        StripEditor::cut_every(channel, strip, self.every_other_period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = SequencerSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.chain_step_offset, 5);
        assert!(matches!(
            settings.popin(0.0, 1.0),
            EffectRecipe::Popin { duration: 12, settle: 4, .. }
        ));
    }

    #[test]
    fn test_serialization() {
        let mut settings = SequencerSettings::default();
        settings.spike.count = 3;
        let ron_str = settings.to_ron().unwrap();
        let loaded = SequencerSettings::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded = SequencerSettings::from_ron("(chain_step_offset: 8)").unwrap();
        assert_eq!(loaded.chain_step_offset, 8);
        assert_eq!(loaded.popin, PopinSettings::default());
    }

    #[test]
    fn test_cut_burst_uses_period() {
        use crate::channel::ChannelId;
        use crate::strip::{Strip, StripKind};

        let settings = SequencerSettings::from_ron("(every_other_period: 4)").unwrap();
        let mut channel = Channel::new(ChannelId(1));
        let burst = channel
            .insert(Strip::new("burst", StripKind::Image, ChannelId(1), 0, 16))
            .unwrap();

        let mut group = settings.cut_burst(&mut channel, burst).unwrap();
        assert_eq!(group.len(), 4);
        StripEditor::remove_every_other(&mut channel, &mut group).unwrap();
        assert_eq!(channel.end_frame(), 8);
    }

    #[test]
    fn test_newer_version_rejected() {
        assert!(matches!(
            SequencerSettings::from_ron("(version: 99)"),
            Err(SequencerError::Settings(_))
        ));
    }
}
