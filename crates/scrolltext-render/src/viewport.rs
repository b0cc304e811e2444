#![forbid(unsafe_code)]

//! Scrolling text area over a [`PixelSurface`].
//!
//! The text area starts `margin` rows below the top of the surface and ends
//! `margin` rows above the bottom. It holds [`ViewportState::max_lines`]
//! slots of `line_pitch` rows each; new blocks are appended below the
//! occupied slots.
//!
//! When a block does not fit, the oldest lines are discarded by moving the
//! surviving rows up in place and clearing everything below them. A block
//! taller than the whole area is dropped without touching the surface.

use tracing::{debug, warn};

use crate::surface::PixelSurface;

/// What [`ViewportState::prepare`] decided for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendPlan {
    /// The block fits below the occupied lines; draw its top at `y`.
    Fits { y: usize },
    /// `discarded` old lines were scrolled out first; draw at `y`.
    Scrolled { y: usize, discarded: usize },
    /// The block is taller than the whole text area and was skipped.
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportState {
    start_y: usize,
    line_pitch: usize,
    max_lines: usize,
    occupied: usize,
}

impl ViewportState {
    /// Derive the text area for a surface `surface_height` rows tall.
    ///
    /// A zero `line_pitch`, or margins that leave no room, give a capacity of
    /// zero lines; every non-empty append is then dropped.
    #[must_use]
    pub fn new(surface_height: usize, line_pitch: usize, margin: usize) -> Self {
        let usable = surface_height.saturating_sub(margin.saturating_mul(2));
        let max_lines = usable.checked_div(line_pitch).unwrap_or(0);
        debug!(surface_height, line_pitch, margin, max_lines, "viewport derived");
        Self {
            start_y: margin,
            line_pitch,
            max_lines,
            occupied: 0,
        }
    }

    /// First pixel row of the text area.
    #[must_use]
    pub fn start_y(&self) -> usize {
        self.start_y
    }

    #[must_use]
    pub fn line_pitch(&self) -> usize {
        self.line_pitch
    }

    /// Capacity in lines.
    #[must_use]
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Lines currently holding content.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Make room for a block of `lines` lines, scrolling `surface` if needed.
    ///
    /// On [`AppendPlan::Fits`] and [`AppendPlan::Scrolled`] the caller draws
    /// the block at the returned row and then calls [`commit`](Self::commit).
    pub fn prepare(&mut self, lines: usize, surface: &mut PixelSurface) -> AppendPlan {
        if self.occupied.saturating_add(lines) <= self.max_lines {
            return AppendPlan::Fits { y: self.cursor_y() };
        }
        if lines > self.max_lines {
            warn!(
                lines,
                max_lines = self.max_lines,
                "block taller than viewport, dropped"
            );
            return AppendPlan::Dropped;
        }

        let discarded = lines.min(self.occupied);
        let kept = self.occupied - discarded;
        let pitch = self.line_pitch;
        surface.move_rows(
            self.start_y + discarded * pitch,
            self.start_y,
            kept * pitch,
        );
        let area_end = self.start_y + self.max_lines * pitch;
        let clear_from = self.start_y + kept * pitch;
        surface.clear_rows(clear_from, area_end - clear_from);
        self.occupied = kept;

        debug!(discarded, kept, "viewport scrolled");
        AppendPlan::Scrolled {
            y: self.cursor_y(),
            discarded,
        }
    }

    /// Record that `lines` lines were drawn at the prepared position.
    pub fn commit(&mut self, lines: usize) {
        self.occupied = self.occupied.saturating_add(lines).min(self.max_lines);
    }

    /// Forget all content. The surface is not touched.
    pub fn reset(&mut self) {
        self.occupied = 0;
    }

    fn cursor_y(&self) -> usize {
        self.start_y + self.occupied * self.line_pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelFormat;
    use tracing_test::traced_test;

    // 1px wide, 2-row pitch, 2-row margin, 5 lines: rows 2..12 of 14.
    fn area() -> (ViewportState, PixelSurface) {
        let viewport = ViewportState::new(14, 2, 2);
        let surface = PixelSurface::new(1, 14, 1, PixelFormat::Rgb565).expect("surface");
        (viewport, surface)
    }

    /// Tag every row of line slot `line` with `tag`.
    fn fill_line(viewport: &ViewportState, surface: &mut PixelSurface, line: usize, tag: u8) {
        let y = viewport.start_y() + line * viewport.line_pitch();
        for row in y..y + viewport.line_pitch() {
            surface.data_mut()[row * 2] = tag;
        }
    }

    fn line_tags(surface: &PixelSurface) -> Vec<u8> {
        (0..surface.height()).map(|y| surface.data()[y * 2]).collect()
    }

    #[test]
    fn capacity_excludes_both_margins() {
        let (viewport, _) = area();
        assert_eq!(viewport.max_lines(), 5);
        assert_eq!(viewport.start_y(), 2);
        assert_eq!(ViewportState::new(10, 0, 0).max_lines(), 0);
        assert_eq!(ViewportState::new(10, 3, 6).max_lines(), 0);
    }

    #[test]
    fn appends_stack_below_each_other() {
        let (mut viewport, mut surface) = area();
        assert_eq!(viewport.prepare(2, &mut surface), AppendPlan::Fits { y: 2 });
        viewport.commit(2);
        assert_eq!(viewport.prepare(3, &mut surface), AppendPlan::Fits { y: 6 });
        viewport.commit(3);
        assert_eq!(viewport.occupied(), 5);
    }

    #[test]
    fn overflow_scrolls_out_the_oldest_lines() {
        let (mut viewport, mut surface) = area();
        for line in 0..4 {
            fill_line(&viewport, &mut surface, line, line as u8 + 1);
        }
        viewport.commit(4);

        let plan = viewport.prepare(3, &mut surface);
        assert_eq!(plan, AppendPlan::Scrolled { y: 4, discarded: 3 });
        assert_eq!(viewport.occupied(), 1);
        // Line 4 moved to slot 0; everything below it is cleared.
        assert_eq!(
            line_tags(&surface),
            [0, 0, 4, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        );

        viewport.commit(3);
        assert_eq!(viewport.occupied(), 4);
    }

    #[test]
    fn block_taller_than_area_leaves_surface_untouched() {
        let (mut viewport, mut surface) = area();
        fill_line(&viewport, &mut surface, 0, 9);
        viewport.commit(1);
        let before = surface.clone();

        assert_eq!(viewport.prepare(6, &mut surface), AppendPlan::Dropped);
        assert_eq!(surface, before);
        assert_eq!(viewport.occupied(), 1);
    }

    #[test]
    #[traced_test]
    fn dropped_block_is_logged() {
        let (mut viewport, mut surface) = area();
        assert_eq!(viewport.prepare(9, &mut surface), AppendPlan::Dropped);
        assert!(logs_contain("block taller than viewport, dropped"));
        assert!(logs_contain("max_lines=5"));
    }

    #[test]
    fn margins_are_never_scrolled() {
        let (mut viewport, mut surface) = area();
        surface.data_mut()[0] = 0x77;
        surface.data_mut()[13 * 2] = 0x77;
        for line in 0..5 {
            fill_line(&viewport, &mut surface, line, 1);
        }
        viewport.commit(5);
        viewport.prepare(5, &mut surface);
        assert_eq!(surface.data()[0], 0x77);
        assert_eq!(surface.data()[13 * 2], 0x77);
        assert_eq!(viewport.occupied(), 0);
    }

    #[test]
    fn reset_forgets_content() {
        let (mut viewport, mut surface) = area();
        viewport.commit(3);
        viewport.reset();
        assert_eq!(viewport.prepare(1, &mut surface), AppendPlan::Fits { y: 2 });
    }
}
