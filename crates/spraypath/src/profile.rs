//! Machine profile: head layout, bed size and motion settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bitmap::{BITS_PER_BLOCK, MAX_ROW_COUNT};
use crate::error::{Result, SprayError};
use crate::head::HeadGeometry;

/// Machine-specific settings for one spray printer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineProfile {
    /// Profile name.
    pub name: String,
    /// Distance between valve centres (mm).
    pub valve_spacing: f32,
    /// Number of valve blocks on the head.
    pub block_count: u16,
    /// Valves per block. One block is one byte on the wire, so this is 8.
    pub nozzles_per_block: u16,
    /// Bed length in row units; truncated to a whole number of rows.
    pub bed_length: f32,
    /// Y position of the first row.
    pub bed_start: u32,
    /// Feed rate of the first travel move of a layer.
    pub feed_rate: u32,
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self::standard()
    }
}

impl MachineProfile {
    /// The 88-valve head: 11 blocks of 8 valves on a 5 mm pitch.
    pub fn standard() -> Self {
        Self {
            name: "88-valve spray head".into(),
            valve_spacing: 5.0,
            block_count: 11,
            nozzles_per_block: 8,
            bed_length: 1400.0,
            bed_start: 0,
            feed_rate: 8000,
        }
    }

    /// Parse a profile from TOML. Missing keys take the standard values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let profile: Self = toml::from_str(text).map_err(|e| SprayError::Config(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load and validate a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| SprayError::Config(e.to_string()))
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.valve_spacing.is_finite() || self.valve_spacing <= 0.0 {
            return Err(SprayError::InvalidSettings(
                "valve_spacing must be positive".into(),
            ));
        }
        if self.block_count == 0 {
            return Err(SprayError::InvalidSettings(
                "block_count must be at least 1".into(),
            ));
        }
        if self.nozzles_per_block != BITS_PER_BLOCK {
            return Err(SprayError::InvalidSettings(format!(
                "nozzles_per_block must be {}, got {}",
                BITS_PER_BLOCK, self.nozzles_per_block
            )));
        }
        if !self.bed_length.is_finite() || self.bed_length <= 0.0 {
            return Err(SprayError::InvalidSettings(
                "bed_length must be positive".into(),
            ));
        }
        if self.row_count() == 0 {
            return Err(SprayError::InvalidSettings(
                "bed_length must cover at least one row".into(),
            ));
        }
        if self.row_count() > MAX_ROW_COUNT {
            return Err(SprayError::InvalidSettings(format!(
                "bed_length must not exceed {} rows",
                MAX_ROW_COUNT
            )));
        }
        if self.feed_rate == 0 {
            return Err(SprayError::InvalidSettings(
                "feed_rate must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Head geometry for this machine.
    pub fn head(&self) -> HeadGeometry {
        HeadGeometry::new(self.valve_spacing, self.block_count, self.nozzles_per_block)
    }

    /// Number of bitmap rows covering the bed.
    pub fn row_count(&self) -> usize {
        self.bed_length.trunc() as usize
    }
}
