//! Per-row valve bitmap for one layer.

use tracing::debug;

use crate::error::{Result, SprayError};
use crate::head::HeadGeometry;

/// Valves per block; one block is one byte of a row.
pub const BITS_PER_BLOCK: u16 = 8;

/// Largest supported number of rows.
pub const MAX_ROW_COUNT: usize = u16::MAX as usize;

/// Convert a Y coordinate to the row holding it.
///
/// Rows are one coordinate unit tall, so this is `floor(y)`.
pub fn row_index(y: f32) -> i64 {
    y.floor() as i64
}

/// Valve states for every row of the bed.
///
/// Each row holds `row_width_bytes` bytes. Rasterization only ever sets bits
/// in the first `block_count` bytes; the rest is filled by the bit-plane
/// transform on the way out. Bits are never cleared once set.
#[derive(Debug, Clone)]
pub struct ValveBitmap {
    head: HeadGeometry,
    row_count: usize,
    row_width: usize,
    data: Vec<u8>,
}

impl ValveBitmap {
    /// Create an all-zero bitmap with `row_count` rows for the given head.
    ///
    /// The head must have [`BITS_PER_BLOCK`] valves per block, and
    /// `row_count` may not exceed [`MAX_ROW_COUNT`].
    pub fn new(head: HeadGeometry, row_count: usize) -> Result<Self> {
        if head.nozzles_per_block() != BITS_PER_BLOCK {
            return Err(SprayError::InvalidSettings(format!(
                "nozzles_per_block must be {}, got {}",
                BITS_PER_BLOCK,
                head.nozzles_per_block()
            )));
        }
        if row_count > MAX_ROW_COUNT {
            return Err(SprayError::InvalidSettings(format!(
                "row count {} exceeds {}",
                row_count, MAX_ROW_COUNT
            )));
        }
        let row_width = head.row_width_bytes();
        Ok(Self {
            head,
            row_count,
            row_width,
            data: vec![0; row_count * row_width],
        })
    }

    /// Head this bitmap addresses.
    pub fn head(&self) -> &HeadGeometry {
        &self.head
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Bytes per row.
    pub fn row_width_bytes(&self) -> usize {
        self.row_width
    }

    /// Raw bytes of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= row_count()`.
    pub fn row(&self, i: usize) -> &[u8] {
        let start = i * self.row_width;
        &self.data[start..start + self.row_width]
    }

    /// Iterate over all rows, top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[u8]> + ExactSizeIterator {
        // chunks_exact on an empty row width would panic
        self.data.chunks_exact(self.row_width.max(1))
    }

    /// Whether the valve `(block, offset)` is open in `row`.
    ///
    /// Addresses outside the head read as closed.
    pub fn is_set(&self, row: usize, block: u32, offset: u32) -> bool {
        offset < u32::from(BITS_PER_BLOCK)
            && block < u32::from(self.head.block_count())
            && self.row(row)[block as usize] & (1 << offset) != 0
    }

    /// Whether no bit is set anywhere.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Close every valve in every row.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Open the valve under `x` for rows `[floor(y_low), floor(y_high))`.
    ///
    /// The row containing `y_high` is left closed so the valve shuts before
    /// the head reaches the segment end. Requires `y_low <= y_high`.
    pub fn paint_vertical_segment(&mut self, x: f32, y_low: f32, y_high: f32) -> Result<()> {
        for v in [x, y_low, y_high] {
            if !v.is_finite() {
                return Err(SprayError::NonFiniteCoordinate(v));
            }
        }

        let (block, offset) = self.head.signed_block_and_offset(x);
        let block_limit = usize::from(self.head.block_count());
        if block < 0 || block >= block_limit as i64 {
            return Err(SprayError::block_out_of_range(block, block_limit));
        }

        let begin = row_index(y_low);
        let end = row_index(y_high);
        if begin < 0 || begin as usize > self.row_count {
            return Err(SprayError::row_out_of_range(begin, self.row_count));
        }
        if end < begin || end as usize > self.row_count {
            return Err(SprayError::row_out_of_range(end, self.row_count));
        }

        let mask = 1u8 << offset;
        let width = self.row_width;
        for row in begin as usize..end as usize {
            self.data[row * width + block as usize] |= mask;
        }

        debug!(x, block, offset, begin, end, "painted spray segment");
        Ok(())
    }
}
