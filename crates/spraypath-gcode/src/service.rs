//! Request/response boundary for layer payloads from the slicer.
//!
//! The transport (the slicer's plugin connection) hands over one layer of
//! G-code text per request and expects one valve program back, or a failure.
//! Every call builds its own [`LayerDriver`]; only the profile is shared.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use spraypath::{MachineProfile, Result};
use tracing::{error, warn};

use crate::driver::LayerDriver;

/// Prefix of the slicer's layer marker comment.
pub const LAYER_MARKER: &str = ";LAYER:";

/// One layer of G-code from the slicer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRequest {
    /// Raw G-code text of the layer.
    pub gcode: String,
}

/// The generated valve program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerResponse {
    /// Machine program; empty when the payload had no active layer.
    pub gcode: String,
}

/// Parse a `;LAYER:<n>` marker line.
///
/// The number is the leading integer after the prefix, so trailing text
/// such as `;LAYER:5 ;comment` still reads as layer 5.
pub fn parse_layer_marker(line: &str) -> Option<i32> {
    let rest = line.strip_prefix(LAYER_MARKER)?.trim_start();
    let sign_len = usize::from(rest.starts_with(['-', '+']));
    let digits = rest[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len() - sign_len);
    rest[..sign_len + digits].parse().ok()
}

/// Split a payload at its first usable layer marker.
///
/// Returns the layer number and the lines after the marker. Lines before it
/// are dropped. Negative (raft) layers and malformed markers do not start a
/// layer.
pub fn split_layer(payload: &str) -> (Option<i32>, impl Iterator<Item = &str>) {
    let mut lines = payload.lines();
    let layer = lines
        .by_ref()
        .find_map(|line| parse_layer_marker(line).filter(|n| *n >= 0));
    (layer, lines)
}

/// Generate the valve program for one layer payload.
///
/// Fatal rasterization errors are logged and returned; the caller should
/// answer with a failure and not retry the same payload.
pub fn handle_layer(profile: &MachineProfile, request: &LayerRequest) -> Result<LayerResponse> {
    let mut driver = LayerDriver::new(profile)?;
    let (layer, lines) = split_layer(&request.gcode);
    if layer.is_none() {
        warn!("payload has no active layer marker; returning empty program");
    }

    match driver.process_layer(layer, lines) {
        Ok(gcode) => Ok(LayerResponse { gcode }),
        Err(e) => {
            error!(?layer, error = %e, "layer generation failed");
            Err(e)
        }
    }
}

/// Generate many layers in parallel, one driver per layer.
///
/// Results come back in request order.
pub fn handle_layers(
    profile: &MachineProfile,
    requests: &[LayerRequest],
) -> Vec<Result<LayerResponse>> {
    requests
        .par_iter()
        .map(|request| handle_layer(profile, request))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layer_marker() {
        assert_eq!(parse_layer_marker(";LAYER:0"), Some(0));
        assert_eq!(parse_layer_marker(";LAYER:12\r"), Some(12));
        assert_eq!(parse_layer_marker(";LAYER:-3"), Some(-3));
        assert_eq!(parse_layer_marker(";LAYER: 7"), Some(7));
        assert_eq!(parse_layer_marker(";LAYER:5 ;comment"), Some(5));
        assert_eq!(parse_layer_marker(";LAYER:8abc"), Some(8));
        assert_eq!(parse_layer_marker(";LAYER:abc"), None);
        assert_eq!(parse_layer_marker(";LAYER:-"), None);
        assert_eq!(parse_layer_marker(";LAYER:99999999999"), None);
        assert_eq!(parse_layer_marker(";LAYER_COUNT:20"), None);
        assert_eq!(parse_layer_marker("G1 X0"), None);
    }

    #[test]
    fn test_split_layer() {
        let payload = "G1 X1 Y1 E1\n;LAYER:-1\n;LAYER:4\nG0 X0 Y0\nG1 X0 Y3 E1\n";
        let (layer, lines) = split_layer(payload);
        assert_eq!(layer, Some(4));
        assert_eq!(lines.collect::<Vec<_>>(), ["G0 X0 Y0", "G1 X0 Y3 E1"]);
    }

    #[test]
    fn test_split_layer_without_marker() {
        let (layer, mut lines) = split_layer("G0 X0 Y0\nG1 X0 Y3 E1\n");
        assert_eq!(layer, None);
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_handle_layer_without_marker_is_empty() {
        let request = LayerRequest {
            gcode: ";FLAVOR:Marlin\nG0 X0 Y0\n".into(),
        };
        let response = handle_layer(&MachineProfile::standard(), &request).unwrap();
        assert!(response.gcode.is_empty());
    }

    #[test]
    fn test_handle_layer_rejects_invalid_profile() {
        let profile = MachineProfile {
            nozzles_per_block: 4,
            ..MachineProfile::standard()
        };
        assert!(handle_layer(&profile, &LayerRequest::default()).is_err());
    }
}
