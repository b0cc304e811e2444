#![forbid(unsafe_code)]

//! Per-codepoint glyph bitmap cache for the active face.
//!
//! Bitmaps live in an insertion-ordered arena with a codepoint → index map on
//! the side, so each codepoint is rasterized at most once per face. The cache
//! is unbounded: entries are only dropped all at once, when the face they were
//! rasterized for is replaced or the context shuts down.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::engine::{FontEngine, RasterGlyph};
use crate::error::{RenderError, Result};
use crate::face::FaceManager;

/// One rasterized character. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    codepoint: char,
    width: usize,
    rows: usize,
    pitch: usize,
    left: i32,
    top: i32,
    advance: i32,
    buffer: Vec<u8>,
}

impl GlyphBitmap {
    /// Take ownership of an engine raster, copying `pitch * rows` coverage
    /// bytes into a freshly allocated buffer.
    ///
    /// Bottom-up bitmaps (negative pitch) are not supported.
    pub fn from_raster(codepoint: char, raster: &RasterGlyph) -> Result<Self> {
        if raster.pitch < 0 {
            return Err(RenderError::UnsupportedFormat(format!(
                "negative pitch {} for U+{:04X}",
                raster.pitch, codepoint as u32
            )));
        }
        let (Ok(width), Ok(rows)) = (usize::try_from(raster.width), usize::try_from(raster.rows))
        else {
            return Err(RenderError::Resource(format!(
                "invalid bitmap size {}x{} for U+{:04X}",
                raster.width, raster.rows, codepoint as u32
            )));
        };
        let pitch = raster.pitch as usize;
        if rows > 0 && width > pitch {
            return Err(RenderError::Resource(format!(
                "pitch {pitch} narrower than width {width} for U+{:04X}",
                codepoint as u32
            )));
        }

        let len = pitch
            .checked_mul(rows)
            .ok_or(RenderError::Memory { bytes: usize::MAX })?;
        let src = raster.buffer.get(..len).ok_or_else(|| {
            RenderError::Resource(format!(
                "coverage buffer holds {} of {len} bytes for U+{:04X}",
                raster.buffer.len(),
                codepoint as u32
            ))
        })?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(|_| RenderError::Memory { bytes: len })?;
        buffer.extend_from_slice(src);

        Ok(Self {
            codepoint,
            width,
            rows,
            pitch,
            left: raster.left,
            top: raster.top,
            advance: raster.advance,
            buffer,
        })
    }

    #[must_use]
    pub fn codepoint(&self) -> char {
        self.codepoint
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Bytes per bitmap row; may exceed `width` due to alignment.
    #[must_use]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    #[must_use]
    pub fn left(&self) -> i32 {
        self.left
    }

    #[must_use]
    pub fn top(&self) -> i32 {
        self.top
    }

    #[must_use]
    pub fn advance(&self) -> i32 {
        self.advance
    }

    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Coverage bytes of row `y`, excluding pitch padding.
    #[must_use]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.pitch;
        &self.buffer[start..start + self.width]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub bytes_cached: u64,
}

/// Unbounded glyph cache bound to one face generation at a time.
#[derive(Debug, Default)]
pub struct GlyphCache {
    generation: Option<u64>,
    // Arena in encounter order.
    glyphs: Vec<GlyphBitmap>,
    // Codepoint -> arena index.
    index: FxHashMap<char, usize>,
    stats: GlyphCacheStats,
}

impl GlyphCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the bitmap for `ch`, rasterizing it through the active face on
    /// a miss.
    ///
    /// If the active face differs from the one the cache was filled for, all
    /// entries are dropped first. A negative-pitch raster is rejected and not
    /// cached.
    pub fn get<E: FontEngine>(
        &mut self,
        faces: &mut FaceManager<E>,
        ch: char,
    ) -> Result<&GlyphBitmap> {
        let generation = faces.generation().ok_or(RenderError::NoFace)?;
        if self.generation != Some(generation) {
            if !self.glyphs.is_empty() {
                debug!(
                    dropped = self.glyphs.len(),
                    "face changed, invalidating glyph cache"
                );
            }
            self.clear();
            self.generation = Some(generation);
        }

        if let Some(&idx) = self.index.get(&ch) {
            self.stats.hits += 1;
            return Ok(&self.glyphs[idx]);
        }

        self.stats.misses += 1;
        let raster = faces.rasterize(ch)?;
        let bitmap = GlyphBitmap::from_raster(ch, &raster)?;
        trace!(
            codepoint = ch as u32,
            width = bitmap.width,
            rows = bitmap.rows,
            advance = bitmap.advance,
            "glyph cached"
        );

        let idx = self.glyphs.len();
        self.stats.bytes_cached += bitmap.buffer.len() as u64;
        self.glyphs.push(bitmap);
        self.index.insert(ch, idx);
        Ok(&self.glyphs[idx])
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.index.clear();
        self.generation = None;
        self.stats.bytes_cached = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.index.contains_key(&ch)
    }

    /// Cached bitmaps in the order they were first requested.
    pub fn iter(&self) -> impl Iterator<Item = &GlyphBitmap> {
        self.glyphs.iter()
    }

    #[must_use]
    pub fn stats(&self) -> GlyphCacheStats {
        self.stats
    }
}
