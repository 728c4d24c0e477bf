//! Bit-plane transform splitting each row into forward and return passes.
//!
//! Rasterized rows keep valve bits packed in the low half of the row. The
//! controller wants them as two planes instead: a row's bits are read as
//! consecutive pairs (bits 0-1, 2-3, 4-5, 6-7 of byte 0, then byte 1, ...).
//! Pair `p` sends its first bit to bit `p % 8` of byte `p / 8` and its
//! second bit to the same position `W / 2` bytes further on.
//!
//! ```text
//! in : [1101_0001, 0010_0111]
//! out: [0011_1101, 0101_1000]
//! ```

use spraypath::{Result, SprayError, ValveBitmap};

/// Deinterleave one row into `out`.
///
/// `row` and `out` must have the same even length.
pub fn deinterleave_into(row: &[u8], out: &mut [u8]) -> Result<()> {
    let width = row.len();
    if width % 2 != 0 {
        return Err(SprayError::OddRowWidth(width));
    }
    debug_assert_eq!(out.len(), width);
    let half = width / 2;

    out.fill(0);
    for (n, &byte) in row.iter().enumerate() {
        for pair in 0..4 {
            let p = n * 4 + pair;
            let low = (byte >> (2 * pair)) & 1;
            let high = (byte >> (2 * pair + 1)) & 1;
            out[p / 8] |= low << (p % 8);
            out[p / 8 + half] |= high << (p % 8);
        }
    }
    Ok(())
}

/// Deinterleave one row.
pub fn deinterleave(row: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0; row.len()];
    deinterleave_into(row, &mut out)?;
    Ok(out)
}

/// A bitmap after the bit-plane transform.
#[derive(Debug, Clone)]
pub struct BitPlanes {
    row_count: usize,
    width: usize,
    data: Vec<u8>,
}

impl BitPlanes {
    /// Transform every row of a bitmap.
    pub fn from_bitmap(bitmap: &ValveBitmap) -> Result<Self> {
        let width = bitmap.row_width_bytes();
        let row_count = bitmap.row_count();
        let mut data = vec![0; row_count * width];
        for (i, row) in bitmap.rows().enumerate() {
            deinterleave_into(row, &mut data[i * width..(i + 1) * width])?;
        }
        Ok(Self {
            row_count,
            width,
            data,
        })
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Bytes per pass in each row.
    pub fn pass_width(&self) -> usize {
        self.width / 2
    }

    /// Forward-pass bytes of row `i`.
    pub fn forward(&self, i: usize) -> &[u8] {
        let start = i * self.width;
        &self.data[start..start + self.width / 2]
    }

    /// Return-pass bytes of row `i`.
    pub fn back(&self, i: usize) -> &[u8] {
        let start = i * self.width;
        &self.data[start + self.width / 2..start + self.width]
    }
}
