#![forbid(unsafe_code)]

//! Character-granularity line wrapping.
//!
//! [`layout`] is the single wrap routine in the crate. It walks the text once,
//! resolves every character's advance through the glyph cache, and reports
//! each placement decision as a [`LayoutEvent`]. Line counting
//! ([`compute_lines`]) and drawing ([`crate::blit::Blitter`]) are both sinks
//! over the same event stream, so they always agree on where lines break.
//!
//! Rules, left to right with a pen offset `w` starting at 0:
//!
//! - `'\n'` starts a new line (a [`FitReason::BreakNotAllowed`] error when
//!   wrapping is off).
//! - A character whose advance would push `w` past the target width starts a
//!   new line and is retried there. On an already empty line the character
//!   can never fit and layout fails with [`FitReason::GlyphTooWide`].
//!
//! There is no word-boundary awareness; a wrap may split a word anywhere.

use tracing::trace;

use crate::engine::FontEngine;
use crate::error::{FitReason, RenderError, Result};
use crate::face::FaceManager;
use crate::glyph_cache::{GlyphBitmap, GlyphCache};

/// Why a new line was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    /// A `'\n'` in the input.
    Explicit,
    /// The next glyph did not fit the remaining width.
    Wrap,
}

/// One placement decision of [`layout`].
#[derive(Debug, Clone, Copy)]
pub enum LayoutEvent<'a> {
    /// Place `bitmap` with its pen at `pen_x` pixels from the line start.
    Glyph { bitmap: &'a GlyphBitmap, pen_x: i32 },
    /// Move the pen to the start of the next line.
    NewLine(LineBreak),
}

/// Lay out `text` within `target_width` pixels, feeding every decision to
/// `sink`. Returns the number of lines used (at least 1).
///
/// `text` is decoded as UTF-8 up front; malformed input fails before any
/// event is emitted.
pub fn layout<E, F>(
    faces: &mut FaceManager<E>,
    cache: &mut GlyphCache,
    text: &[u8],
    target_width: i32,
    wrap_allowed: bool,
    mut sink: F,
) -> Result<usize>
where
    E: FontEngine,
    F: FnMut(LayoutEvent<'_>),
{
    let text = std::str::from_utf8(text)?;
    let mut lines = 1usize;
    let mut w = 0i32;

    for ch in text.chars() {
        if ch == '\n' {
            if !wrap_allowed {
                return Err(RenderError::Fit(FitReason::BreakNotAllowed));
            }
            lines += 1;
            w = 0;
            sink(LayoutEvent::NewLine(LineBreak::Explicit));
            continue;
        }

        let glyph = cache.get(faces, ch)?;
        let advance = glyph.advance();
        if w.saturating_add(advance) > target_width {
            if !wrap_allowed {
                return Err(RenderError::Fit(FitReason::WrapNotAllowed));
            }
            if w == 0 {
                return Err(RenderError::Fit(FitReason::GlyphTooWide {
                    codepoint: ch,
                    advance,
                }));
            }
            lines += 1;
            w = 0;
            trace!(codepoint = ch as u32, line = lines, "wrap");
            sink(LayoutEvent::NewLine(LineBreak::Wrap));
            // Retry against the empty line.
            if advance > target_width {
                return Err(RenderError::Fit(FitReason::GlyphTooWide {
                    codepoint: ch,
                    advance,
                }));
            }
        }

        sink(LayoutEvent::Glyph { bitmap: glyph, pen_x: w });
        w = w.saturating_add(advance);
    }

    Ok(lines)
}

/// Number of display lines `text` needs at `target_width`, without drawing.
pub fn compute_lines<E: FontEngine>(
    faces: &mut FaceManager<E>,
    cache: &mut GlyphCache,
    text: &[u8],
    target_width: i32,
    wrap_allowed: bool,
) -> Result<usize> {
    layout(faces, cache, text, target_width, wrap_allowed, |_| {})
}
