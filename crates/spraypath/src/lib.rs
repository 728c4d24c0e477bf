#![warn(missing_docs)]

//! Toolpath rasterization for multi-valve spray print heads.
//!
//! A spray head carries a row of independently switched valves and sweeps
//! along Y across the bed. This crate turns one layer of slicer output into
//! a per-row valve bitmap: every vertical extrusion move becomes a run of
//! open bits for the valve under its X position.
//!
//! # Example
//!
//! ```
//! use spraypath::{MachineProfile, MoveParser, ValveBitmap};
//!
//! let profile = MachineProfile::standard();
//! let mut bitmap = ValveBitmap::new(profile.head(), profile.row_count())?;
//! let mut parser = MoveParser::new();
//!
//! for line in ["G0 X30 Y30", "G1 X30 Y40 E1.5"] {
//!     parser.feed(&mut bitmap, line)?;
//! }
//! assert!(bitmap.is_set(30, 0, 6));
//! # Ok::<(), spraypath::SprayError>(())
//! ```

pub mod bitmap;
pub mod error;
pub mod head;
pub mod moves;
pub mod parser;
pub mod profile;

pub use bitmap::{row_index, ValveBitmap, BITS_PER_BLOCK, MAX_ROW_COUNT};
pub use error::{Axis, MalformedLine, Result, SprayError};
pub use head::{HeadGeometry, PASS_COUNT};
pub use moves::Move;
pub use parser::{Feed, MoveParser, ParserState};
pub use profile::MachineProfile;
