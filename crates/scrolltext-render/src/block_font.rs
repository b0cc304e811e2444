#![forbid(unsafe_code)]

//! Procedural block-glyph engine.
//!
//! Every printable character is drawn as an outlined box whose interior shade
//! is derived from the codepoint, on a fixed advance grid. Useful wherever a
//! deterministic engine is needed without a font file: headless runs, tests,
//! and benchmarks. Per-character overrides let callers force specific
//! advances, rasterization failures, or bottom-up bitmaps.

use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::engine::{DesignMetrics, FontEngine, RasterGlyph};
use crate::error::EngineError;
use crate::face::design_to_screen;

const UNITS_PER_EM: i32 = 1000;
const LINE_HEIGHT_UNITS: i32 = 1200;
const ADVANCE_UNITS: i32 = 600;
const CAP_HEIGHT_UNITS: i32 = 700;
/// Bitmap rows are padded to this many bytes.
const ROW_ALIGN: usize = 4;

/// Face handle for [`BlockFont`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockFace {
    point_size: u32,
    dpi: u32,
}

impl BlockFace {
    /// Nominal em size in pixels.
    #[must_use]
    pub fn px_size(&self) -> u32 {
        let px = u64::from(self.point_size) * u64::from(self.dpi) / 72;
        u32::try_from(px).unwrap_or(u32::MAX)
    }

    fn scale(&self, units: i32) -> i32 {
        design_to_screen(units, self.point_size, self.dpi, UNITS_PER_EM)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlockFont {
    advances: FxHashMap<char, i32>,
    missing: FxHashSet<char>,
    bottom_up: FxHashSet<char>,
    unavailable: Vec<PathBuf>,
    max_px_size: Option<u32>,
    rasterize_calls: u64,
}

impl BlockFont {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the pixel advance of `ch`, independent of the face size.
    #[must_use]
    pub fn with_advance(mut self, ch: char, advance: i32) -> Self {
        self.advances.insert(ch, advance);
        self
    }

    /// Make rasterization of `ch` fail.
    #[must_use]
    pub fn with_missing(mut self, ch: char) -> Self {
        self.missing.insert(ch);
        self
    }

    /// Report `ch` as a bottom-up bitmap (negative pitch).
    #[must_use]
    pub fn with_bottom_up(mut self, ch: char) -> Self {
        self.bottom_up.insert(ch);
        self
    }

    /// Make opening `path` fail.
    #[must_use]
    pub fn with_unavailable_face(mut self, path: impl Into<PathBuf>) -> Self {
        self.unavailable.push(path.into());
        self
    }

    /// Reject pixel sizes above `px`.
    #[must_use]
    pub fn with_max_pixel_size(mut self, px: u32) -> Self {
        self.max_px_size = Some(px);
        self
    }

    /// Number of rasterizations performed so far.
    #[must_use]
    pub fn rasterize_calls(&self) -> u64 {
        self.rasterize_calls
    }
}

/// Single-channel coverage canvas with row padding.
struct Canvas {
    width: usize,
    rows: usize,
    pitch: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: usize, rows: usize) -> Self {
        let pitch = width.div_ceil(ROW_ALIGN) * ROW_ALIGN;
        Self {
            width,
            rows,
            pitch,
            pixels: vec![0u8; pitch * rows],
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, value: u8) {
        for row in y..(y + h).min(self.rows) {
            let start = row * self.pitch;
            for col in x..(x + w).min(self.width) {
                self.pixels[start + col] = value;
            }
        }
    }

    fn stroke_rect(&mut self, value: u8) {
        self.fill_rect(0, 0, self.width, 1, value);
        self.fill_rect(0, self.rows.saturating_sub(1), self.width, 1, value);
        self.fill_rect(0, 0, 1, self.rows, value);
        self.fill_rect(self.width.saturating_sub(1), 0, 1, self.rows, value);
    }
}

impl FontEngine for BlockFont {
    type Face = BlockFace;

    fn open_face(&mut self, path: &Path) -> Result<BlockFace, EngineError> {
        if self.unavailable.iter().any(|p| p == path) {
            return Err(EngineError::new(format!("cannot open {}", path.display())));
        }
        Ok(BlockFace::default())
    }

    fn set_pixel_size(
        &mut self,
        face: &mut BlockFace,
        point_size: u32,
        dpi: u32,
    ) -> Result<(), EngineError> {
        let px = u64::from(point_size) * u64::from(dpi) / 72;
        let px = u32::try_from(px).map_err(|_| EngineError::new("pixel size overflow"))?;
        if px == 0 {
            return Err(EngineError::new("pixel size rounds to zero"));
        }
        if self.max_px_size.is_some_and(|max| px > max) {
            return Err(EngineError::new(format!("pixel size {px} not available")));
        }
        face.point_size = point_size;
        face.dpi = dpi;
        Ok(())
    }

    fn design_metrics(&self, _face: &BlockFace) -> DesignMetrics {
        DesignMetrics {
            line_height_units: LINE_HEIGHT_UNITS,
            max_advance_units: ADVANCE_UNITS,
            units_per_em: UNITS_PER_EM,
        }
    }

    fn rasterize(&mut self, face: &mut BlockFace, ch: char) -> Result<RasterGlyph, EngineError> {
        self.rasterize_calls += 1;
        if self.missing.contains(&ch) {
            return Err(EngineError::new("glyph not present in face"));
        }

        let advance = self
            .advances
            .get(&ch)
            .copied()
            .unwrap_or_else(|| face.scale(ADVANCE_UNITS));

        if ch.is_whitespace() || ch.is_control() {
            return Ok(RasterGlyph {
                width: 0,
                rows: 0,
                pitch: 0,
                left: 0,
                top: 0,
                advance,
                buffer: Vec::new(),
            });
        }

        // Keep one blank column on each side when the advance allows it.
        let (left, width) = if advance >= 3 {
            (1, advance - 2)
        } else {
            (0, advance.max(1))
        };
        let width = usize::try_from(width).unwrap_or(1);
        let rows = usize::try_from(face.scale(CAP_HEIGHT_UNITS))
            .unwrap_or(0)
            .max(1);
        let mut canvas = Canvas::new(width, rows);
        let shade = 0x20 + ((ch as u32).wrapping_mul(37) % 0xC0) as u8;
        canvas.fill_rect(0, 0, width, rows, shade);
        canvas.stroke_rect(0xFF);

        let pitch = i32::try_from(canvas.pitch).unwrap_or(i32::MAX);
        Ok(RasterGlyph {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            rows: i32::try_from(rows).unwrap_or(i32::MAX),
            pitch: if self.bottom_up.contains(&ch) { -pitch } else { pitch },
            left,
            top: i32::try_from(rows).unwrap_or(i32::MAX),
            advance,
            buffer: canvas.pixels,
        })
    }
}
