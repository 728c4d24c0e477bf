//! Streaming move parser that rasterizes spray segments.

use tracing::trace;

use crate::bitmap::ValveBitmap;
use crate::error::{Result, SprayError};
use crate::moves::Move;

/// Max X drift between segment endpoints still treated as vertical.
pub const VERTICAL_TOLERANCE: f32 = 1e-8;

/// Parser state between lines.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParserState {
    /// No move seen yet in this layer.
    #[default]
    AwaitingFirstMove,
    /// Last move seen in this layer.
    HaveLastMove(Move),
}

/// What a single fed line did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feed {
    /// Not a usable move; state unchanged.
    Ignored,
    /// A move that opened no valves (travel, or the first move of the layer).
    Moved(Move),
    /// An extrusion move that was painted into the bitmap.
    Painted(Move),
}

/// Feeds G-code lines one at a time into a [`ValveBitmap`].
///
/// The parser holds only the previous move; the bitmap is passed in on each
/// call so its owner decides when it is emitted or discarded.
#[derive(Debug, Clone, Default)]
pub struct MoveParser {
    state: ParserState,
}

impl MoveParser {
    /// Create a parser awaiting its first move.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// The previous move, if any.
    pub fn last_move(&self) -> Option<Move> {
        match self.state {
            ParserState::AwaitingFirstMove => None,
            ParserState::HaveLastMove(mv) => Some(mv),
        }
    }

    /// Forget the previous move.
    pub fn reset(&mut self) {
        self.state = ParserState::AwaitingFirstMove;
    }

    /// Feed one line.
    ///
    /// Unrecognized lines are skipped. An extrusion move following another
    /// move paints the segment between them; the segment must be vertical
    /// and inside the bitmap.
    pub fn feed(&mut self, bitmap: &mut ValveBitmap, line: &str) -> Result<Feed> {
        let mv = match Move::parse(line) {
            Ok(mv) => mv,
            Err(reason) => {
                trace!(line, %reason, "skipping line");
                return Ok(Feed::Ignored);
            }
        };

        let painted = match self.state {
            ParserState::HaveLastMove(prev) if mv.is_extrusion() => {
                paint_segment(bitmap, &prev, &mv)?;
                true
            }
            _ => false,
        };

        self.state = ParserState::HaveLastMove(mv);
        Ok(if painted {
            Feed::Painted(mv)
        } else {
            Feed::Moved(mv)
        })
    }

    /// Feed every line, stopping at the first fatal error.
    pub fn feed_all<'a, I>(&mut self, bitmap: &mut ValveBitmap, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for line in lines {
            self.feed(bitmap, line)?;
        }
        Ok(())
    }
}

fn paint_segment(bitmap: &mut ValveBitmap, from: &Move, to: &Move) -> Result<()> {
    if (from.x - to.x).abs() > VERTICAL_TOLERANCE {
        return Err(SprayError::NonVerticalSegment {
            x_start: from.x,
            x_end: to.x,
        });
    }
    let (low, high) = if from.y > to.y {
        (to.y, from.y)
    } else {
        (from.y, to.y)
    };
    bitmap.paint_vertical_segment(to.x, low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Axis;
    use crate::head::HeadGeometry;

    fn bitmap(rows: usize) -> ValveBitmap {
        ValveBitmap::new(HeadGeometry::new(5.0, 11, 8), rows).unwrap()
    }

    #[test]
    fn test_first_move_never_paints() {
        let mut bm = bitmap(20);
        let mut parser = MoveParser::new();
        let feed = parser.feed(&mut bm, "G1 X0 Y5 E1").unwrap();
        assert_eq!(feed, Feed::Moved(Move::new(0.0, 5.0, 0.0, 1.0)));
        assert!(bm.is_empty());
        assert_eq!(parser.last_move(), Some(Move::new(0.0, 5.0, 0.0, 1.0)));
    }

    #[test]
    fn test_ignored_lines_keep_state() {
        let mut bm = bitmap(20);
        let mut parser = MoveParser::new();
        assert_eq!(parser.feed(&mut bm, ";TYPE:FILL").unwrap(), Feed::Ignored);
        assert_eq!(parser.state(), ParserState::AwaitingFirstMove);

        parser.feed(&mut bm, "G0 X10 Y0").unwrap();
        assert_eq!(parser.feed(&mut bm, "G1").unwrap(), Feed::Ignored);
        assert_eq!(parser.feed(&mut bm, "M107").unwrap(), Feed::Ignored);
        assert_eq!(parser.last_move(), Some(Move::new(10.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_scenario_paints_only_extruding_segments() {
        let mut bm = bitmap(15);
        let mut parser = MoveParser::new();
        parser
            .feed_all(
                &mut bm,
                [
                    "G0 X0 Y0 E0",
                    "G1 X0 Y5 E12.1",
                    "G1 X15 Y10",
                    "G1 X15 Y0 E123.1",
                ],
            )
            .unwrap();

        let (b0, o0) = bm.head().block_and_offset(0.0);
        let (b15, o15) = bm.head().block_and_offset(15.0);
        for row in 0..5 {
            assert!(bm.is_set(row, b0, o0));
        }
        for row in 5..15 {
            assert!(!bm.is_set(row, b0, o0));
        }
        for row in 0..10 {
            assert!(bm.is_set(row, b15, o15));
        }
        for row in 10..15 {
            assert!(!bm.is_set(row, b15, o15));
        }
    }

    #[test]
    fn test_downward_segment_is_sorted() {
        let mut bm = bitmap(20);
        let mut parser = MoveParser::new();
        parser.feed(&mut bm, "G0 X5 Y12").unwrap();
        let feed = parser.feed(&mut bm, "G1 X5 Y8 E0.4").unwrap();
        assert!(matches!(feed, Feed::Painted(_)));
        assert!(!bm.is_set(7, 0, 1));
        assert!(bm.is_set(8, 0, 1));
        assert!(bm.is_set(11, 0, 1));
        assert!(!bm.is_set(12, 0, 1));
    }

    #[test]
    fn test_non_vertical_segment_is_fatal() {
        let mut bm = bitmap(20);
        let mut parser = MoveParser::new();
        parser.feed(&mut bm, "G0 X0 Y0").unwrap();
        let err = parser.feed(&mut bm, "G1 X5 Y10 E1").unwrap_err();
        assert!(matches!(
            err,
            SprayError::NonVerticalSegment { x_start, x_end } if x_start == 0.0 && x_end == 5.0
        ));
    }

    #[test]
    fn test_out_of_range_is_fatal() {
        let mut bm = bitmap(20);
        let mut parser = MoveParser::new();
        parser.feed(&mut bm, "G0 X0 Y0").unwrap();
        let err = parser.feed(&mut bm, "G1 X0 Y30 E1").unwrap_err();
        assert!(matches!(
            err,
            SprayError::AddressOutOfRange { axis: Axis::Row, .. }
        ));
    }

    #[test]
    fn test_non_vertical_travel_is_fine() {
        let mut bm = bitmap(20);
        let mut parser = MoveParser::new();
        parser
            .feed_all(&mut bm, ["G0 X0 Y0", "G0 X100 Y3", "G0 X7 Y19"])
            .unwrap();
        assert!(bm.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut bm = bitmap(20);
        let mut parser = MoveParser::new();
        parser.feed(&mut bm, "G0 X0 Y0").unwrap();
        parser.reset();
        assert_eq!(
            parser.feed(&mut bm, "G1 X0 Y10 E1").unwrap(),
            Feed::Moved(Move::new(0.0, 10.0, 0.0, 1.0))
        );
        assert!(bm.is_empty());
    }
}
