#![forbid(unsafe_code)]

//! Rasterization engine seam.
//!
//! The core never loads font files or rasterizes outlines itself. It consumes
//! an injected [`FontEngine`] that can open a face, set its pixel size, report
//! design-unit metrics, and rasterize a single character into a coverage
//! bitmap. How the engine is obtained (linked, bundled, procedural) is not the
//! core's concern.

use std::path::Path;

use crate::error::EngineError;

/// Face-wide metrics in font design units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignMetrics {
    /// Baseline-to-baseline distance.
    pub line_height_units: i32,
    /// Widest horizontal advance of any glyph.
    pub max_advance_units: i32,
    /// Size of the em square.
    pub units_per_em: i32,
}

/// One character rasterized by the engine.
///
/// `buffer` holds `pitch * rows` coverage bytes, one byte per pixel.
/// A negative `pitch` denotes a bottom-up bitmap, which the glyph cache
/// rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterGlyph {
    pub width: i32,
    pub rows: i32,
    pub pitch: i32,
    /// Offset from the pen position to the bitmap's left edge.
    pub left: i32,
    /// Offset from the baseline up to the bitmap's top edge.
    pub top: i32,
    /// Horizontal pen advance in whole pixels.
    pub advance: i32,
    pub buffer: Vec<u8>,
}

/// Capability to open faces and rasterize characters.
pub trait FontEngine {
    /// Engine-specific handle for an opened face.
    type Face;

    /// Open the face stored at `path`.
    fn open_face(&mut self, path: &Path) -> Result<Self::Face, EngineError>;

    /// Set the nominal size of `face` in points at the given screen density.
    fn set_pixel_size(
        &mut self,
        face: &mut Self::Face,
        point_size: u32,
        dpi: u32,
    ) -> Result<(), EngineError>;

    /// Report the design-unit metrics of `face`.
    fn design_metrics(&self, face: &Self::Face) -> DesignMetrics;

    /// Rasterize `ch` at the face's current pixel size.
    fn rasterize(&mut self, face: &mut Self::Face, ch: char) -> Result<RasterGlyph, EngineError>;
}
