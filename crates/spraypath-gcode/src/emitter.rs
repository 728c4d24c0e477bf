//! Serialization of a layer bitmap into a two-pass valve program.

use serde::{Deserialize, Serialize};
use spraypath::{MachineProfile, Result, ValveBitmap};

use crate::commands;
use crate::transform::BitPlanes;

// "G1 Y0000\nVALVES_SET VALUES=255,...,255\n" for an 11-block head.
const MAX_ENTRY_LEN: usize = 71;

/// Motion settings used while emitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitSettings {
    /// Y position of row 0.
    pub bed_start: u32,
    /// Feed rate set on the first travel move.
    pub feed_rate: u32,
}

impl Default for EmitSettings {
    fn default() -> Self {
        Self {
            bed_start: 0,
            feed_rate: 8000,
        }
    }
}

impl From<&MachineProfile> for EmitSettings {
    fn from(profile: &MachineProfile) -> Self {
        Self {
            bed_start: profile.bed_start,
            feed_rate: profile.feed_rate,
        }
    }
}

/// Transform a bitmap and emit its layer program.
pub fn emit_layer(bitmap: &ValveBitmap, layer: i32, settings: &EmitSettings) -> Result<String> {
    let planes = BitPlanes::from_bitmap(bitmap)?;
    Ok(emit_planes(&planes, layer, settings))
}

/// Emit the layer program for already transformed rows.
///
/// The head sweeps forward over every row opening the forward-pass valves,
/// switches pass one row past the end, then sweeps back opening the
/// return-pass valves. Each value is sent with its bits reversed, since the
/// controller maps valve 0 to the most significant bit.
pub fn emit_planes(planes: &BitPlanes, layer: i32, settings: &EmitSettings) -> String {
    let rows = planes.row_count();
    let width = planes.pass_width();
    let start = i64::from(settings.bed_start);

    let mut out = String::with_capacity(2 * rows * MAX_ENTRY_LEN + 512);
    out.push_str(&commands::layer_begin(layer));

    for i in 0..rows {
        let feed = (i == 0).then_some(settings.feed_rate);
        out.push_str(&commands::travel(start + i as i64, feed));
        out.push_str(&commands::valves_set(
            planes.forward(i).iter().map(|b| b.reverse_bits()),
        ));
    }

    let end = start + rows as i64;
    out.push_str(&commands::pass_switch(end, width));

    for i in (0..rows).rev() {
        out.push_str(&commands::travel(start + i as i64 + 1, None));
        if i == 0 {
            // back at the origin row
            out.push_str(&commands::idle_valves(width));
        } else {
            out.push_str(&commands::valves_set(
                planes.back(i).iter().map(|b| b.reverse_bits()),
            ));
        }
    }

    out.push_str(&commands::layer_end(start, width));
    out
}
