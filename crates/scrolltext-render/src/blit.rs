#![forbid(unsafe_code)]

//! Glyph blitter: draws laid-out text into a [`PixelSurface`].
//!
//! Coverage is written as gray with an overwrite, not a blend, so the
//! background under partially covered edge pixels is lost. Anything that
//! falls outside the surface is clipped.

use tracing::trace;

use crate::engine::FontEngine;
use crate::error::Result;
use crate::face::FaceManager;
use crate::glyph_cache::{GlyphBitmap, GlyphCache};
use crate::layout::{LayoutEvent, layout};
use crate::surface::PixelSurface;

/// Draws laid-out text one line height apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Blitter;

impl Blitter {
    /// Render `text` wrapped at `max_width`, with the first line's top at
    /// `origin_y`. Returns the number of lines drawn.
    ///
    /// Wrap decisions come from [`layout`], so a string for which
    /// [`compute_lines`](crate::layout::compute_lines) returned `n` draws
    /// exactly `n` lines. Pixels are written as layout proceeds: a failure
    /// part-way leaves the glyphs before it on the surface.
    #[allow(clippy::too_many_arguments)]
    pub fn render<E: FontEngine>(
        &self,
        faces: &mut FaceManager<E>,
        cache: &mut GlyphCache,
        surface: &mut PixelSurface,
        text: &[u8],
        origin_x: i32,
        origin_y: i32,
        max_width: i32,
    ) -> Result<usize> {
        let line_height = faces.line_height();
        let mut pen_y = origin_y.saturating_add(line_height);

        let lines = layout(faces, cache, text, max_width, true, |event| match event {
            LayoutEvent::Glyph { bitmap, pen_x } => {
                draw_glyph(surface, bitmap, origin_x.saturating_add(pen_x), pen_y);
            }
            LayoutEvent::NewLine(_) => pen_y = pen_y.saturating_add(line_height),
        })?;

        trace!(lines, origin_x, origin_y, max_width, "text rendered");
        Ok(lines)
    }
}

/// Copy `bitmap` onto `surface` with its pen at `(pen_x, baseline)`.
fn draw_glyph(surface: &mut PixelSurface, bitmap: &GlyphBitmap, pen_x: i32, baseline: i32) {
    let x0 = i64::from(pen_x) + i64::from(bitmap.left());
    let y0 = i64::from(baseline) - i64::from(bitmap.top());
    let (Some(cols), Some(rows)) = (
        clip(x0, bitmap.width(), surface.width()),
        clip(y0, bitmap.rows(), surface.height()),
    ) else {
        return;
    };

    for row in rows {
        let src = bitmap.row(row);
        let y = (y0 + row as i64) as usize;
        for col in cols.clone() {
            let x = (x0 + col as i64) as usize;
            surface.put_coverage(x, y, src[col]);
        }
    }
}

/// Source index range of a `len`-long span starting at `start` that lands
/// inside `0..limit`.
fn clip(start: i64, len: usize, limit: usize) -> Option<std::ops::Range<usize>> {
    let len = i64::try_from(len).ok()?;
    let limit = i64::try_from(limit).ok()?;
    let lo = (-start).clamp(0, len);
    let hi = (limit - start).clamp(0, len);
    (lo < hi).then(|| lo as usize..hi as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_font::BlockFont;
    use crate::surface::{PixelFormat, pack_rgb565};

    // 10pt at 120dpi: line height 20, advance 10, glyph box 8x11 at left 1.
    fn setup() -> (FaceManager<BlockFont>, GlyphCache) {
        let mut faces = FaceManager::new(BlockFont::new());
        faces.load("block", 10, 120).expect("load");
        (faces, GlyphCache::new())
    }

    fn inked_rows(surface: &PixelSurface) -> Vec<usize> {
        (0..surface.height())
            .filter(|&y| (0..surface.width()).any(|x| surface.pixel(x, y) != Some(0)))
            .collect()
    }

    #[test]
    fn clip_ranges() {
        assert_eq!(clip(0, 4, 10), Some(0..4));
        assert_eq!(clip(-2, 4, 10), Some(2..4));
        assert_eq!(clip(8, 4, 10), Some(0..2));
        assert_eq!(clip(10, 4, 10), None);
        assert_eq!(clip(-4, 4, 10), None);
    }

    #[test]
    fn first_baseline_sits_one_line_below_origin() {
        let (mut faces, mut cache) = setup();
        let mut surface = PixelSurface::new(40, 60, 40, PixelFormat::Rgba8888).expect("surface");
        Blitter
            .render(&mut faces, &mut cache, &mut surface, b"A", 0, 5, 40)
            .expect("render");
        // Baseline at 25, glyph top 11 above it.
        assert_eq!(inked_rows(&surface), (14..25).collect::<Vec<_>>());
        assert_eq!(surface.pixel(1, 14), Some(0xFFFF_FFFF));
        assert_eq!(surface.pixel(0, 14), Some(0));
    }

    #[test]
    fn lines_advance_by_line_height() {
        let (mut faces, mut cache) = setup();
        let mut surface = PixelSurface::new(40, 100, 40, PixelFormat::Rgb565).expect("surface");
        let n = Blitter
            .render(&mut faces, &mut cache, &mut surface, b"A\nB", 0, 0, 40)
            .expect("render");
        assert_eq!(n, 2);
        let mut expected: Vec<usize> = (9..20).collect();
        expected.extend(29..40);
        assert_eq!(inked_rows(&surface), expected);
        assert_eq!(surface.pixel(1, 9), Some(u32::from(pack_rgb565(0xFF))));
    }

    #[test]
    fn wrapped_glyph_restarts_at_origin_x() {
        let (mut faces, mut cache) = setup();
        let mut surface = PixelSurface::new(60, 60, 60, PixelFormat::Rgba8888).expect("surface");
        Blitter
            .render(&mut faces, &mut cache, &mut surface, b"ab", 20, 0, 10)
            .expect("render");
        // Both glyphs start at x = 21, one line apart.
        assert_ne!(surface.pixel(21, 9), Some(0));
        assert_ne!(surface.pixel(21, 29), Some(0));
        assert_eq!(surface.pixel(31, 9), Some(0));
    }

    #[test]
    fn draws_outside_the_surface_are_clipped() {
        let (mut faces, mut cache) = setup();
        let mut surface = PixelSurface::new(12, 12, 16, PixelFormat::Rgba8888).expect("surface");
        let blitter = Blitter;
        blitter
            .render(&mut faces, &mut cache, &mut surface, b"MM", -5, -15, 100)
            .expect("partially off-surface");
        blitter
            .render(&mut faces, &mut cache, &mut surface, b"M", 500, 500, 100)
            .expect("fully off-surface");
        // Only the visible part of the first line landed; padding untouched.
        let row_bytes = surface.row_bytes();
        for y in 0..12 {
            let padding = &surface.data()[y * row_bytes + 12 * 4..(y + 1) * row_bytes];
            assert!(padding.iter().all(|&b| b == 0));
        }
        assert!(!inked_rows(&surface).is_empty());
    }
}
