#![warn(missing_docs)]

//! Valve-program generation for spray print heads.
//!
//! This crate takes the valve bitmap built by [`spraypath`] and serializes
//! it into the controller's command language: a forward pass and a return
//! pass over the bed, one `VALVES_SET` per row.
//!
//! # Example
//!
//! ```
//! use spraypath::MachineProfile;
//! use spraypath_gcode::{handle_layer, LayerRequest};
//!
//! let profile = MachineProfile {
//!     bed_length: 50.0,
//!     ..MachineProfile::standard()
//! };
//! let request = LayerRequest {
//!     gcode: ";LAYER:0\nG0 X30 Y10\nG1 X30 Y20 E0.5\n".into(),
//! };
//! let response = handle_layer(&profile, &request)?;
//! assert!(response.gcode.starts_with(";Layer1\n"));
//! # Ok::<(), spraypath::SprayError>(())
//! ```

pub mod commands;
pub mod driver;
pub mod emitter;
pub mod service;
pub mod transform;

pub use driver::LayerDriver;
pub use emitter::{emit_layer, emit_planes, EmitSettings};
pub use service::{
    handle_layer, handle_layers, parse_layer_marker, split_layer, LayerRequest, LayerResponse,
};
pub use transform::{deinterleave, deinterleave_into, BitPlanes};
