//! Property-based invariant tests for wrapping, caching, and scrolling.
//!
//! All tests use the procedural `BlockFont` at 10pt/120dpi, where every
//! character advances 10px and lines are 20px apart.
//!
//! **Layout:**
//! 1. Line count matches the per-segment character-wrap oracle.
//! 2. Drawing emits exactly as many lines as counting reports.
//! 3. No glyph is placed past the target width.
//! 4. Without wrapping, layout succeeds iff there is no break and the text fits.
//!
//! **Glyph cache:**
//! 5. Repeated lookups return identical bitmaps and rasterize once per codepoint.
//!
//! **Viewport:**
//! 6. Occupied lines after an append follow the fit/scroll/drop rule.
//! 7. Occupied lines never exceed capacity.
//!
//! **Packing:**
//! 8. RGBA has equal channels and full alpha; 5/6/5 fields all derive from `v >> 3`.

use proptest::prelude::*;
use scrolltext_render::{
    AppendPlan, BlockFont, FaceManager, FitReason, GlyphCache, LayoutEvent, PixelFormat,
    PixelSurface, RenderError, ViewportState, compute_lines, layout, pack_rgb565, pack_rgba8888,
};

const ADVANCE: i32 = 10;

fn faces() -> FaceManager<BlockFont> {
    let mut faces = FaceManager::new(BlockFont::new());
    faces.load("block", 10, 120).expect("load");
    faces
}

/// Expected line count for uniform advances, or `None` when a glyph cannot
/// fit an empty line.
fn oracle_lines(text: &str, width: i32) -> Option<usize> {
    let per_line = usize::try_from(width / ADVANCE).unwrap_or(0);
    let mut total = 0;
    for segment in text.split('\n') {
        let chars = segment.chars().count();
        if chars == 0 {
            total += 1;
        } else if per_line == 0 {
            return None;
        } else {
            total += chars.div_ceil(per_line);
        }
    }
    Some(total)
}

// ── Strategies ────────────────────────────────────────────────────────────

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,\n]{0,60}"
}

fn width_strategy() -> impl Strategy<Value = i32> {
    0i32..=200
}

// 1. Line count matches the oracle

proptest! {
    #[test]
    fn line_count_matches_oracle(text in text_strategy(), width in width_strategy()) {
        let mut faces = faces();
        let mut cache = GlyphCache::new();
        let got = compute_lines(&mut faces, &mut cache, text.as_bytes(), width, true);
        match oracle_lines(&text, width) {
            Some(n) => prop_assert_eq!(got, Ok(n)),
            None => prop_assert!(
                matches!(got, Err(RenderError::Fit(FitReason::GlyphTooWide { .. }))),
                "expected GlyphTooWide, got {:?}", got
            ),
        }
    }
}

// 2 + 3. Drawing agrees with counting and respects the width

proptest! {
    #[test]
    fn layout_events_agree_with_count(text in text_strategy(), width in 10i32..=200) {
        let mut faces = faces();
        let mut cache = GlyphCache::new();
        let counted = compute_lines(&mut faces, &mut cache, text.as_bytes(), width, true)
            .expect("fits");

        let mut drawn = 1usize;
        let mut overflow = None;
        let reported = layout(&mut faces, &mut cache, text.as_bytes(), width, true, |ev| match ev {
            LayoutEvent::NewLine(_) => drawn += 1,
            LayoutEvent::Glyph { bitmap, pen_x } => {
                if pen_x + bitmap.advance() > width {
                    overflow = Some((bitmap.codepoint(), pen_x));
                }
            }
        })
        .expect("layout");

        prop_assert_eq!(reported, counted);
        prop_assert_eq!(drawn, counted);
        prop_assert!(overflow.is_none(), "glyph past width: {:?}", overflow);
    }
}

// 4. No-wrap success criterion

proptest! {
    #[test]
    fn no_wrap_succeeds_iff_single_fitting_line(
        text in text_strategy(),
        width in width_strategy(),
    ) {
        let mut faces = faces();
        let mut cache = GlyphCache::new();
        let got = compute_lines(&mut faces, &mut cache, text.as_bytes(), width, false);
        let chars = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        let fits = !text.contains('\n') && chars * ADVANCE <= width;
        if fits {
            prop_assert_eq!(got, Ok(1));
        } else {
            prop_assert!(matches!(got, Err(RenderError::Fit(_))), "got {:?}", got);
        }
    }
}

// 5. Cache idempotence

proptest! {
    #[test]
    fn cache_hits_are_identical(
        chars in proptest::collection::vec(proptest::char::range('!', '~'), 1..40)
    ) {
        let mut faces = faces();
        let mut cache = GlyphCache::new();
        let first: Vec<_> = chars
            .iter()
            .map(|&ch| cache.get(&mut faces, ch).expect("get").clone())
            .collect();
        let calls = faces.engine().rasterize_calls();
        for (ch, expected) in chars.iter().zip(&first) {
            let again = cache.get(&mut faces, *ch).expect("get");
            prop_assert_eq!(again, expected);
        }
        prop_assert_eq!(faces.engine().rasterize_calls(), calls);

        let mut distinct = chars.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(calls as usize, distinct.len());
        prop_assert_eq!(cache.len(), distinct.len());
    }
}

// 6 + 7. Viewport append rule

proptest! {
    #[test]
    fn viewport_append_rule(
        max_lines in 1usize..=12,
        occupied_seed in 0usize..=12,
        lines in 0usize..=16,
    ) {
        let pitch = 3;
        let mut viewport = ViewportState::new(max_lines * pitch, pitch, 0);
        let mut surface = PixelSurface::new(2, max_lines * pitch, 2, PixelFormat::Rgb565)
            .expect("surface");
        let occupied = occupied_seed.min(max_lines);
        viewport.commit(occupied);

        let before = surface.clone();
        let plan = viewport.prepare(lines, &mut surface);
        if plan != AppendPlan::Dropped {
            viewport.commit(lines);
        }

        if occupied + lines <= max_lines {
            prop_assert_eq!(plan, AppendPlan::Fits { y: occupied * pitch });
            prop_assert_eq!(viewport.occupied(), occupied + lines);
        } else if lines > max_lines {
            prop_assert_eq!(plan, AppendPlan::Dropped);
            prop_assert_eq!(viewport.occupied(), occupied);
            prop_assert_eq!(surface, before);
        } else {
            let discarded = lines.min(occupied);
            prop_assert_eq!(
                plan,
                AppendPlan::Scrolled { y: (occupied - discarded) * pitch, discarded }
            );
            prop_assert_eq!(viewport.occupied(), occupied - discarded + lines);
        }
        prop_assert!(viewport.occupied() <= max_lines);
    }
}

// 8. Pixel packing

proptest! {
    #[test]
    fn packing_derives_from_coverage(v in any::<u8>()) {
        let [r, g, b, a] = pack_rgba8888(v);
        prop_assert_eq!((r, g, b, a), (v, v, v, 0xFF));

        let px = pack_rgb565(v);
        let five = u16::from(v >> 3);
        prop_assert_eq!(px & 0x1F, five);
        prop_assert_eq!((px >> 5) & 0x3F, (five << 1) & 0x3F);
        prop_assert_eq!(px >> 11, five);
    }
}
