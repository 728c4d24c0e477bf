//! Motion command parsing.
//!
//! Only linear moves are understood:
//!
//! ```text
//! G0 X10 Y20
//! G1 X0 Y700 Z23 E65.23
//! ```
//!
//! Fields may appear in any order and any subset, but at least one of
//! X, Y, Z or E must be present. Fields that are missing read as zero.
//! Other words (such as `F1500`) are skipped, and anything after `;` is a
//! comment.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MalformedLine;

/// E values at or below this magnitude do not count as extrusion.
pub const EXTRUSION_TOLERANCE: f32 = 1e-8;

/// One parsed motion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Move {
    /// X position (mm).
    pub x: f32,
    /// Y position (row units).
    pub y: f32,
    /// Z position (mm).
    pub z: f32,
    /// Extrusion amount.
    pub e: f32,
}

impl Move {
    /// Create a move.
    pub fn new(x: f32, y: f32, z: f32, e: f32) -> Self {
        Self { x, y, z, e }
    }

    /// Does this move extrude?
    pub fn is_extrusion(&self) -> bool {
        self.e.abs() > EXTRUSION_TOLERANCE
    }

    /// Parse a `G0`/`G1` line.
    pub fn parse(line: &str) -> Result<Self, MalformedLine> {
        let code = match line.find(';') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let mut words = code.split_whitespace();

        match words.next() {
            Some("G0") | Some("G1") => {}
            _ => return Err(MalformedLine::NotAMove),
        }

        let mut mv = Move::default();
        let mut any_field = false;
        for word in words {
            let mut chars = word.chars();
            let Some(letter) = chars.next() else {
                continue;
            };
            let slot = match letter {
                'X' => &mut mv.x,
                'Y' => &mut mv.y,
                'Z' => &mut mv.z,
                'E' => &mut mv.e,
                _ => continue,
            };
            let text = chars.as_str();
            let value = f32::from_str(text).map_err(|_| MalformedLine::BadNumber {
                field: letter,
                text: text.to_string(),
            })?;
            if !value.is_finite() {
                return Err(MalformedLine::NonFinite { field: letter });
            }
            *slot = value;
            any_field = true;
        }

        if !any_field {
            return Err(MalformedLine::NoFields);
        }
        Ok(mv)
    }
}

impl FromStr for Move {
    type Err = MalformedLine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}
