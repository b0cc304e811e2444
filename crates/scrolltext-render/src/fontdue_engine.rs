#![forbid(unsafe_code)]

//! TrueType/OpenType engine backed by [`fontdue`].

use std::fs;
use std::path::Path;

use fontdue::{Font, FontSettings};
use tracing::debug;

use crate::engine::{DesignMetrics, FontEngine, RasterGlyph};
use crate::error::EngineError;

/// A parsed font plus its current pixel size.
pub struct FontdueFace {
    font: Font,
    px: f32,
    metrics: DesignMetrics,
}

impl std::fmt::Debug for FontdueFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueFace")
            .field("px", &self.px)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FontdueEngine;

impl FontdueEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a face from bytes already in memory.
    pub fn face_from_bytes(&self, bytes: &[u8]) -> Result<FontdueFace, EngineError> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(EngineError::new)?;
        let upem = font.units_per_em();
        let line_height = font
            .horizontal_line_metrics(upem)
            .map_or(upem, |m| m.new_line_size);
        // Advances at px = upem are in design units.
        let max_advance = (0..font.glyph_count())
            .map(|idx| font.metrics_indexed(idx, upem).advance_width)
            .fold(0.0f32, f32::max);

        let metrics = DesignMetrics {
            line_height_units: line_height.round() as i32,
            max_advance_units: max_advance.round() as i32,
            units_per_em: upem.round() as i32,
        };
        debug!(glyphs = font.glyph_count(), ?metrics, "font parsed");
        Ok(FontdueFace {
            font,
            px: 0.0,
            metrics,
        })
    }
}

impl FontEngine for FontdueEngine {
    type Face = FontdueFace;

    fn open_face(&mut self, path: &Path) -> Result<FontdueFace, EngineError> {
        let bytes = fs::read(path)
            .map_err(|err| EngineError::new(format!("{}: {err}", path.display())))?;
        self.face_from_bytes(&bytes)
    }

    fn set_pixel_size(
        &mut self,
        face: &mut FontdueFace,
        point_size: u32,
        dpi: u32,
    ) -> Result<(), EngineError> {
        let px = (f64::from(point_size) * f64::from(dpi) / 72.0) as f32;
        if !px.is_finite() || px <= 0.0 {
            return Err(EngineError::new(format!("pixel size {px} not usable")));
        }
        face.px = px;
        Ok(())
    }

    fn design_metrics(&self, face: &FontdueFace) -> DesignMetrics {
        face.metrics
    }

    fn rasterize(&mut self, face: &mut FontdueFace, ch: char) -> Result<RasterGlyph, EngineError> {
        if face.px <= 0.0 {
            return Err(EngineError::new("pixel size not set"));
        }
        let (m, buffer) = face.font.rasterize(ch, face.px);
        let width = i32::try_from(m.width).map_err(|_| EngineError::new("glyph too wide"))?;
        let rows = i32::try_from(m.height).map_err(|_| EngineError::new("glyph too tall"))?;
        Ok(RasterGlyph {
            width,
            rows,
            // fontdue bitmaps are tightly packed and top-down.
            pitch: width,
            left: m.xmin,
            top: m.ymin + rows,
            advance: m.advance_width.round() as i32,
            buffer,
        })
    }
}
