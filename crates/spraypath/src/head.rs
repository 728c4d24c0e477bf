//! Print head addressing.

use serde::{Deserialize, Serialize};

/// Number of head passes per layer (forward and return).
pub const PASS_COUNT: u16 = 2;

/// Layout of the valves across the print head.
///
/// Valves sit on a regular pitch along X and are grouped into blocks; each
/// block is one byte on the wire, one bit per valve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadGeometry {
    valve_spacing: f32,
    block_count: u16,
    nozzles_per_block: u16,
}

impl HeadGeometry {
    /// Create a head geometry.
    ///
    /// * `valve_spacing` - distance between the centres of two valves (mm)
    /// * `block_count` - number of valve blocks
    /// * `nozzles_per_block` - valves in each block
    pub fn new(valve_spacing: f32, block_count: u16, nozzles_per_block: u16) -> Self {
        Self {
            valve_spacing,
            block_count,
            nozzles_per_block,
        }
    }

    /// Distance between neighbouring valves (mm).
    pub fn valve_spacing(&self) -> f32 {
        self.valve_spacing
    }

    /// Number of valve blocks.
    pub fn block_count(&self) -> u16 {
        self.block_count
    }

    /// Valves per block.
    pub fn nozzles_per_block(&self) -> u16 {
        self.nozzles_per_block
    }

    /// Total number of valves.
    pub fn nozzle_count(&self) -> u32 {
        u32::from(self.block_count) * u32::from(self.nozzles_per_block)
    }

    /// Width covered by the valves (mm).
    pub fn physical_span(&self) -> f32 {
        self.nozzle_count() as f32 * self.valve_spacing
    }

    /// Bytes needed to hold every valve for every pass.
    pub fn row_width_bytes(&self) -> usize {
        (self.nozzle_count() as usize * PASS_COUNT as usize).div_ceil(8)
    }

    /// Resolve an X coordinate to its `(block, offset)` valve address.
    ///
    /// The valve index is `floor(x / valve_spacing)`. The result is not
    /// bounds-checked: coordinates past the head give a block at or beyond
    /// `block_count`, and blocks that do not fit a `u32` (including every
    /// negative one) saturate to `u32::MAX`.
    pub fn block_and_offset(&self, x: f32) -> (u32, u32) {
        let (block, offset) = self.signed_block_and_offset(x);
        (u32::try_from(block).unwrap_or(u32::MAX), offset)
    }

    /// Like [`HeadGeometry::block_and_offset`], keeping the full signed block.
    pub fn signed_block_and_offset(&self, x: f32) -> (i64, u32) {
        let valve_index = (x / self.valve_spacing).floor() as i64;
        let per_block = i64::from(self.nozzles_per_block.max(1));
        (
            valve_index.div_euclid(per_block),
            valve_index.rem_euclid(per_block) as u32,
        )
    }
}
