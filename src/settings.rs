//! Storm settings
//!
//! Written by the page controls, read by the simulation at the start of each tick.
//! Nothing here is persisted; a reload starts from the defaults.

use serde::{Deserialize, Serialize};

use crate::StormError;
use crate::consts::{MAX_LEVEL, MIN_LEVEL};
use crate::error::parse_level;
use crate::sim::MeteorKind;

/// User-adjustable storm settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Kind given to newly spawned meteors
    pub meteor_kind: MeteorKind,
    /// Spawn probability level (1-10)
    pub intensity: u32,
    /// Base meteor radius level (1-10)
    pub meteor_size: u32,
    /// Whether sound cues play
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            meteor_kind: MeteorKind::Normal,
            intensity: 5,
            meteor_size: 3,
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// Set intensity, clamped to the slider range
    pub fn set_intensity(&mut self, level: u32) {
        self.intensity = level.clamp(MIN_LEVEL, MAX_LEVEL);
    }

    /// Set meteor size, clamped to the slider range
    pub fn set_meteor_size(&mut self, level: u32) {
        self.meteor_size = level.clamp(MIN_LEVEL, MAX_LEVEL);
    }

    /// Parse and apply a raw intensity slider value
    pub fn apply_intensity_str(&mut self, value: &str) -> Result<u32, StormError> {
        self.set_intensity(parse_level("intensity", value)?);
        Ok(self.intensity)
    }

    /// Parse and apply a raw size slider value
    pub fn apply_meteor_size_str(&mut self, value: &str) -> Result<u32, StormError> {
        self.set_meteor_size(parse_level("meteorSize", value)?);
        Ok(self.meteor_size)
    }

    /// Return a copy with every numeric field inside its range
    pub fn clamped(mut self) -> Self {
        self.set_intensity(self.intensity);
        self.set_meteor_size(self.meteor_size);
        self
    }
}
