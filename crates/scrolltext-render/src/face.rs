#![forbid(unsafe_code)]

//! Active face ownership and design-unit to pixel conversion.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::engine::{FontEngine, RasterGlyph};
use crate::error::{RenderError, Result};

/// Convert a length in font design units to device pixels.
///
/// `units * point_size * dpi / (units_per_em * 72)` in integer arithmetic,
/// truncating toward zero. Line spacing and viewport capacity are derived from
/// this value, so the formula must not be changed to a rounding variant.
#[must_use]
pub fn design_to_screen(units: i32, point_size: u32, dpi: u32, units_per_em: i32) -> i32 {
    let den = i64::from(units_per_em) * 72;
    if den == 0 {
        return 0;
    }
    let num = i64::from(units) * i64::from(point_size) * i64::from(dpi);
    let px = num / den;
    i32::try_from(px).unwrap_or(if px < 0 { i32::MIN } else { i32::MAX })
}

/// The active rasterization face and its screen-space metrics.
#[derive(Debug)]
pub struct Face<H> {
    handle: H,
    path: PathBuf,
    point_size: u32,
    dpi: u32,
    line_height_px: i32,
    max_advance_px: i32,
    generation: u64,
}

impl<H> Face<H> {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn point_size(&self) -> u32 {
        self.point_size
    }

    #[must_use]
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Baseline-to-baseline distance in pixels.
    #[must_use]
    pub fn line_height(&self) -> i32 {
        self.line_height_px
    }

    /// Widest glyph advance in pixels.
    #[must_use]
    pub fn max_advance(&self) -> i32 {
        self.max_advance_px
    }

    /// Identifies this (face, size) pair; glyph cache entries are valid only
    /// for the generation they were rasterized under.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns the rasterization engine and at most one active [`Face`].
pub struct FaceManager<E: FontEngine> {
    engine: E,
    active: Option<Face<E::Face>>,
    generation: u64,
}

impl<E: FontEngine> fmt::Debug for FaceManager<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceManager")
            .field("active", &self.active.as_ref().map(|face| face.path()))
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl<E: FontEngine> FaceManager<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            active: None,
            generation: 0,
        }
    }

    /// Open `path` at `point_size` and `dpi`, replacing the active face.
    ///
    /// The previous face is closed before the new one is opened, so a failed
    /// load leaves no face active.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        point_size: u32,
        dpi: u32,
    ) -> Result<&Face<E::Face>> {
        let path = path.as_ref();
        self.close();

        let mut handle = self.engine.open_face(path).map_err(|err| {
            warn!(path = %path.display(), %err, "failed to open face");
            RenderError::Resource(format!("failed to open face {}: {err}", path.display()))
        })?;

        if let Err(err) = self.engine.set_pixel_size(&mut handle, point_size, dpi) {
            warn!(path = %path.display(), point_size, %err, "failed to set face size");
            return Err(RenderError::Size { point_size, dpi });
        }

        let metrics = self.engine.design_metrics(&handle);
        if metrics.units_per_em <= 0 {
            warn!(
                path = %path.display(),
                units_per_em = metrics.units_per_em,
                "face has no usable em square"
            );
            return Err(RenderError::Size { point_size, dpi });
        }
        debug!(
            line_height_units = metrics.line_height_units,
            max_advance_units = metrics.max_advance_units,
            units_per_em = metrics.units_per_em,
            "face design metrics"
        );

        let line_height_px = design_to_screen(
            metrics.line_height_units,
            point_size,
            dpi,
            metrics.units_per_em,
        );
        let max_advance_px = design_to_screen(
            metrics.max_advance_units,
            point_size,
            dpi,
            metrics.units_per_em,
        );

        info!(
            path = %path.display(),
            point_size,
            dpi,
            line_height_px,
            max_advance_px,
            generation = self.generation,
            "face loaded"
        );
        Ok(&*self.active.insert(Face {
            handle,
            path: path.to_path_buf(),
            point_size,
            dpi,
            line_height_px,
            max_advance_px,
            generation: self.generation,
        }))
    }

    /// Close the active face, if any. Glyphs cached for it become stale.
    pub fn close(&mut self) {
        if let Some(face) = self.active.take() {
            debug!(path = %face.path.display(), "face closed");
        }
        self.generation = self.generation.wrapping_add(1);
    }

    #[must_use]
    pub fn face(&self) -> Option<&Face<E::Face>> {
        self.active.as_ref()
    }

    /// Line height of the active face, or 0 when none is loaded.
    #[must_use]
    pub fn line_height(&self) -> i32 {
        self.active.as_ref().map_or(0, Face::line_height)
    }

    /// Generation of the active face.
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        self.active.as_ref().map(Face::generation)
    }

    /// Upper bound of the rendered width of `text`: max advance times the
    /// number of characters.
    pub fn max_string_width(&self, text: &[u8]) -> Result<i32> {
        let face = self.active.as_ref().ok_or(RenderError::NoFace)?;
        let text = std::str::from_utf8(text)?;
        let chars = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        Ok(face.max_advance_px.saturating_mul(chars))
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Rasterize `ch` with the active face.
    pub(crate) fn rasterize(&mut self, ch: char) -> Result<RasterGlyph> {
        let face = self.active.as_mut().ok_or(RenderError::NoFace)?;
        let raster = self.engine.rasterize(&mut face.handle, ch).map_err(|err| {
            warn!(codepoint = ch as u32, %err, "error rendering bitmap");
            RenderError::Resource(format!(
                "failed to rasterize U+{:04X}: {err}",
                ch as u32
            ))
        })?;
        Ok(raster)
    }
}
