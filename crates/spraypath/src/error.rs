//! Error types for rasterization and configuration.

use thiserror::Error;

/// Which bitmap axis an out-of-range address was resolved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row index (vertical position).
    Row,
    /// Valve block index (horizontal position).
    Block,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Block => f.write_str("block"),
        }
    }
}

/// Fatal errors raised while building or serializing a layer.
#[derive(Error, Debug)]
pub enum SprayError {
    /// A spray segment whose endpoints differ in X.
    #[error("segment is not vertical: x changes from {x_start} to {x_end}")]
    NonVerticalSegment {
        /// X of the previous move.
        x_start: f32,
        /// X of the current move.
        x_end: f32,
    },

    /// A resolved row or block index falls outside the bitmap.
    #[error("{axis} index {index} out of range (limit {limit})")]
    AddressOutOfRange {
        /// Axis the index was resolved on.
        axis: Axis,
        /// Offending index.
        index: i64,
        /// Exclusive upper bound for the axis.
        limit: usize,
    },

    /// A non-finite coordinate reached the rasterizer.
    #[error("coordinate is not finite: {0}")]
    NonFiniteCoordinate(f32),

    /// Bit-plane rows must split evenly into two passes.
    #[error("row width {0} is not even")]
    OddRowWidth(usize),

    /// Invalid machine settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Profile could not be decoded.
    #[error("config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SprayError {
    /// Create a row out-of-range error.
    pub fn row_out_of_range(index: i64, limit: usize) -> Self {
        Self::AddressOutOfRange {
            axis: Axis::Row,
            index,
            limit,
        }
    }

    /// Create a block out-of-range error.
    pub fn block_out_of_range(index: i64, limit: usize) -> Self {
        Self::AddressOutOfRange {
            axis: Axis::Block,
            index,
            limit,
        }
    }
}

/// Result type for spraypath operations.
pub type Result<T> = std::result::Result<T, SprayError>;

/// Reasons a text line is not a usable motion command.
///
/// These never abort a layer; the move parser skips the line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedLine {
    /// The line does not start with `G0` or `G1`.
    #[error("not a G0/G1 move")]
    NotAMove,

    /// A move without any X, Y, Z or E field.
    #[error("move has no X, Y, Z or E field")]
    NoFields,

    /// A field whose value is not a number.
    #[error("field {field} has unparsable value {text:?}")]
    BadNumber {
        /// Field letter.
        field: char,
        /// Raw value text.
        text: String,
    },

    /// A field that parsed to NaN or infinity.
    #[error("field {field} is not finite")]
    NonFinite {
        /// Field letter.
        field: char,
    },
}
