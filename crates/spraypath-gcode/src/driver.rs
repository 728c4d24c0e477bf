//! Per-layer orchestration: parse, rasterize, emit.

use spraypath::{Feed, MachineProfile, MoveParser, Result, ValveBitmap};
use tracing::debug;

use crate::emitter::{emit_layer, EmitSettings};

/// Turns one layer of G-code into one valve program.
///
/// A driver owns its bitmap and parser state exclusively. Use one driver per
/// layer in flight; after [`LayerDriver::process_layer`] returns, the driver
/// is empty again and may take the next layer.
#[derive(Debug, Clone)]
pub struct LayerDriver {
    bitmap: ValveBitmap,
    parser: MoveParser,
    settings: EmitSettings,
}

impl LayerDriver {
    /// Create a driver for a validated profile.
    pub fn new(profile: &MachineProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self::with_bitmap(
            ValveBitmap::new(profile.head(), profile.row_count())?,
            EmitSettings::from(profile),
        ))
    }

    /// Create a driver around an existing (usually empty) bitmap.
    pub fn with_bitmap(bitmap: ValveBitmap, settings: EmitSettings) -> Self {
        Self {
            bitmap,
            parser: MoveParser::new(),
            settings,
        }
    }

    /// The bitmap accumulated so far.
    pub fn bitmap(&self) -> &ValveBitmap {
        &self.bitmap
    }

    /// Emit settings in use.
    pub fn settings(&self) -> &EmitSettings {
        &self.settings
    }

    /// Feed a single line into the current layer.
    pub fn feed(&mut self, line: &str) -> Result<Feed> {
        self.parser.feed(&mut self.bitmap, line)
    }

    /// Emit the current bitmap as layer `layer` without resetting.
    pub fn emit(&self, layer: i32) -> Result<String> {
        emit_layer(&self.bitmap, layer, &self.settings)
    }

    /// Close every valve and forget the previous move.
    pub fn reset(&mut self) {
        self.bitmap.clear();
        self.parser.reset();
    }

    /// Process a whole layer.
    ///
    /// `layer` is `None` when no layer marker was found; nothing is parsed
    /// and the result is empty. Otherwise every line is fed, then the bitmap
    /// is emitted. On error nothing is emitted. Either way the driver is
    /// reset afterwards.
    pub fn process_layer<'a, I>(&mut self, layer: Option<i32>, lines: I) -> Result<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let Some(layer) = layer else {
            return Ok(String::new());
        };

        debug!(layer, rows = self.bitmap.row_count(), "processing layer");
        let result = self
            .parser
            .feed_all(&mut self.bitmap, lines)
            .and_then(|()| self.emit(layer));
        self.reset();

        if let Ok(program) = &result {
            debug!(layer, bytes = program.len(), "layer emitted");
        }
        result
    }
}
