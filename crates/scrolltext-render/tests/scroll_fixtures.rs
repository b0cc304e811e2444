//! End-to-end scrolling fixtures through `RenderContext`.
//!
//! Each fixture appends blocks into a small viewport and compares the result,
//! pixel for pixel, with a surface drawn directly at the positions the
//! surviving lines should occupy.

use scrolltext_render::{
    AppendOutcome, BlockFont, FitReason, PixelFormat, PixelSurface, RenderContext, RenderError,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

const WIDTH: usize = 40;

/// 10pt at 120dpi gives 20px lines; `lines` slots with no margin and no gap.
fn context(lines: usize, format: PixelFormat) -> RenderContext<BlockFont> {
    let surface = PixelSurface::new(WIDTH, lines * 20, WIDTH, format).expect("surface");
    let mut ctx = RenderContext::new(BlockFont::new(), surface);
    ctx.load_face("block", 10, 120).expect("load");
    ctx
}

/// Surface with `blocks` drawn at explicit rows.
fn reference(lines: usize, format: PixelFormat, blocks: &[(&str, i32)]) -> PixelSurface {
    let mut ctx = context(lines, format);
    for (text, y) in blocks {
        ctx.render(text.as_bytes(), 0, *y, WIDTH as i32).expect("render");
    }
    ctx.surface().clone()
}

// ── Fixtures ────────────────────────────────────────────────────────────────

#[test]
fn line_counts_at_twenty_pixel_lines() {
    let mut ctx = context(5, PixelFormat::Rgba8888);
    assert_eq!(ctx.line_height(), 20);
    assert_eq!(ctx.compute_lines(b"one\ntwo", 1000, true), Ok(2));
}

#[test]
fn glyph_wider_than_target_fails() {
    let surface = PixelSurface::new(10, 100, 10, PixelFormat::Rgb565).expect("surface");
    let mut ctx = RenderContext::new(BlockFont::new().with_advance('x', 5), surface);
    ctx.load_face("block", 10, 120).expect("load");
    assert_eq!(
        ctx.compute_lines(b"x", 1, true),
        Err(RenderError::Fit(FitReason::GlyphTooWide {
            codepoint: 'x',
            advance: 5
        }))
    );
}

#[test]
fn three_lines_into_four_of_five_scrolls_three_out() {
    for format in [PixelFormat::Rgba8888, PixelFormat::Rgb565] {
        let mut ctx = context(5, format);
        for text in ["a", "b", "c", "d"] {
            ctx.append_block(text.as_bytes(), 0, WIDTH as i32)
                .expect("append");
        }
        assert_eq!(ctx.viewport().occupied(), 4);

        let outcome = ctx.append_block(b"e\nf\ng", 0, WIDTH as i32).expect("append");
        assert_eq!(
            outcome,
            AppendOutcome::Appended {
                lines: 3,
                y: 20,
                discarded: 3
            }
        );
        assert_eq!(ctx.viewport().occupied(), 4);

        // "d" moved up three slots; the new block follows it.
        let expected = reference(5, format, &[("d", 0), ("e\nf\ng", 20)]);
        assert_eq!(ctx.surface(), &expected, "{format:?}");
    }
}

#[test]
fn filling_exactly_does_not_scroll() {
    let mut ctx = context(3, PixelFormat::Rgba8888);
    ctx.append_block(b"a", 0, WIDTH as i32).expect("append");
    let outcome = ctx.append_block(b"b\nc", 0, WIDTH as i32).expect("append");
    assert_eq!(
        outcome,
        AppendOutcome::Appended {
            lines: 2,
            y: 20,
            discarded: 0
        }
    );
    let expected = reference(3, PixelFormat::Rgba8888, &[("a", 0), ("b\nc", 20)]);
    assert_eq!(ctx.surface(), &expected);
}

#[test]
fn full_viewport_block_replaces_everything() {
    let mut ctx = context(3, PixelFormat::Rgb565);
    ctx.append_block(b"a\nb", 0, WIDTH as i32).expect("append");
    ctx.append_block(b"x\ny\nz", 0, WIDTH as i32).expect("append");
    let expected = reference(3, PixelFormat::Rgb565, &[("x\ny\nz", 0)]);
    assert_eq!(ctx.surface(), &expected);
    assert_eq!(ctx.viewport().occupied(), 3);
}

#[test]
fn dropped_block_keeps_previous_frame() {
    let mut ctx = context(2, PixelFormat::Rgba8888);
    ctx.append_block(b"a", 0, WIDTH as i32).expect("append");
    let before = ctx.surface().clone();
    assert_eq!(
        ctx.append_block(b"1\n2\n3", 0, WIDTH as i32),
        Ok(AppendOutcome::Dropped { lines: 3 })
    );
    assert_eq!(ctx.surface(), &before);

    // The producer carries on with the next block.
    assert!(matches!(
        ctx.append_block(b"b", 0, WIDTH as i32),
        Ok(AppendOutcome::Appended { y: 20, .. })
    ));
}

#[test]
fn wrapped_block_counts_every_visual_line() {
    // 40px wide, 10px advance: four characters per line.
    let mut ctx = context(4, PixelFormat::Rgba8888);
    let outcome = ctx.append_block(b"abcdefghij", 0, WIDTH as i32).expect("append");
    assert!(matches!(outcome, AppendOutcome::Appended { lines: 3, .. }));
    let expected = reference(4, PixelFormat::Rgba8888, &[("abcd", 0), ("efgh", 20), ("ij", 40)]);
    assert_eq!(ctx.surface(), &expected);
}
