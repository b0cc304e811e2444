#![forbid(unsafe_code)]

//! The rendering context: one face, its glyph cache, the target surface, and
//! the scrolling viewport, mutated only through the operations below.

use std::fmt;
use std::path::Path;

use tracing::{debug, debug_span, info};

use crate::blit::Blitter;
use crate::engine::FontEngine;
use crate::error::{RenderError, Result};
use crate::face::{Face, FaceManager};
use crate::glyph_cache::GlyphCache;
use crate::layout::compute_lines;
use crate::surface::{PixelFormat, PixelSurface};
use crate::viewport::{AppendPlan, ViewportState};

/// Result of [`RenderContext::append_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The block was drawn with its top at row `y` after scrolling out
    /// `discarded` old lines.
    Appended {
        lines: usize,
        y: usize,
        discarded: usize,
    },
    /// The block needs more lines than the viewport has and was skipped.
    Dropped { lines: usize },
}

pub struct RenderContext<E: FontEngine> {
    faces: FaceManager<E>,
    cache: GlyphCache,
    surface: PixelSurface,
    viewport: ViewportState,
    blitter: Blitter,
    margin: usize,
    line_gap: i32,
}

impl<E: FontEngine> fmt::Debug for RenderContext<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("faces", &self.faces)
            .field("cached_glyphs", &self.cache.len())
            .field("surface", &(self.surface.width(), self.surface.height()))
            .field("viewport", &self.viewport)
            .field("margin", &self.margin)
            .field("line_gap", &self.line_gap)
            .finish()
    }
}

impl<E: FontEngine> RenderContext<E> {
    /// Context drawing into `surface`, with no face, no margin, and no line
    /// gap. Until a face is loaded the viewport has no capacity.
    pub fn new(engine: E, surface: PixelSurface) -> Self {
        let mut ctx = Self {
            faces: FaceManager::new(engine),
            cache: GlyphCache::new(),
            surface,
            viewport: ViewportState::default(),
            blitter: Blitter,
            margin: 0,
            line_gap: 0,
        };
        ctx.rederive_viewport();
        ctx
    }

    /// Load the active face. Cached glyphs of the previous face are dropped
    /// and the viewport is re-derived for the new line height.
    pub fn load_face(
        &mut self,
        path: impl AsRef<Path>,
        point_size: u32,
        dpi: u32,
    ) -> Result<&Face<E::Face>> {
        self.cache.clear();
        let loaded = self.faces.load(path, point_size, dpi).map(|_| ());
        self.rederive_viewport();
        loaded?;
        self.faces.face().ok_or(RenderError::NoFace)
    }

    /// Set the top/bottom margin of the text area and the extra gap between
    /// viewport slots. Lines inside one block stay one line height apart.
    /// Existing content is forgotten by the viewport.
    pub fn configure_viewport(&mut self, margin: usize, line_gap: i32) {
        self.margin = margin;
        self.line_gap = line_gap;
        self.rederive_viewport();
    }

    /// Replace the surface with a zeroed one of the given geometry.
    pub fn resize_surface(
        &mut self,
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<()> {
        self.surface = PixelSurface::new(width, height, stride, format)?;
        info!(width, height, stride, ?format, "surface resized");
        self.rederive_viewport();
        Ok(())
    }

    /// Lines `text` would need at `target_width`.
    pub fn compute_lines(
        &mut self,
        text: &[u8],
        target_width: i32,
        wrap_allowed: bool,
    ) -> Result<usize> {
        compute_lines(
            &mut self.faces,
            &mut self.cache,
            text,
            target_width,
            wrap_allowed,
        )
    }

    /// Draw `text` at an arbitrary position, bypassing the viewport.
    pub fn render(
        &mut self,
        text: &[u8],
        origin_x: i32,
        origin_y: i32,
        max_width: i32,
    ) -> Result<usize> {
        self.blitter.render(
            &mut self.faces,
            &mut self.cache,
            &mut self.surface,
            text,
            origin_x,
            origin_y,
            max_width,
        )
    }

    /// Append `text` below the viewport's content, scrolling if needed.
    ///
    /// Lines are counted before anything is drawn, so layout errors leave the
    /// surface untouched.
    pub fn append_block(
        &mut self,
        text: &[u8],
        origin_x: i32,
        width: i32,
    ) -> Result<AppendOutcome> {
        let _span = debug_span!("append_block", bytes = text.len()).entered();
        let lines = self.compute_lines(text, width, true)?;

        let plan = self.viewport.prepare(lines, &mut self.surface);
        let (y, discarded) = match plan {
            AppendPlan::Fits { y } => (y, 0),
            AppendPlan::Scrolled { y, discarded } => (y, discarded),
            AppendPlan::Dropped => return Ok(AppendOutcome::Dropped { lines }),
        };

        let origin_y = i32::try_from(y).unwrap_or(i32::MAX);
        self.render(text, origin_x, origin_y, width)?;
        self.viewport.commit(lines);
        debug!(
            lines,
            y,
            discarded,
            occupied = self.viewport.occupied(),
            "block appended"
        );
        Ok(AppendOutcome::Appended { lines, y, discarded })
    }

    /// Drop every cached glyph and close the face.
    pub fn shutdown(&mut self) {
        let glyphs = self.cache.len();
        self.cache.clear();
        self.faces.close();
        self.viewport.reset();
        info!(glyphs, "render context shut down");
    }

    pub fn max_string_width(&self, text: &[u8]) -> Result<i32> {
        self.faces.max_string_width(text)
    }

    #[must_use]
    pub fn line_height(&self) -> i32 {
        self.faces.line_height()
    }

    /// Height of one viewport slot: line height plus the configured gap.
    #[must_use]
    pub fn line_pitch(&self) -> i32 {
        self.line_height().saturating_add(self.line_gap)
    }

    #[must_use]
    pub fn faces(&self) -> &FaceManager<E> {
        &self.faces
    }

    #[must_use]
    pub fn cache(&self) -> &GlyphCache {
        &self.cache
    }

    #[must_use]
    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut PixelSurface {
        &mut self.surface
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    fn rederive_viewport(&mut self) {
        // Pitch only counts once a face gives lines a height.
        let pitch = if self.faces.face().is_some() {
            usize::try_from(self.line_pitch()).unwrap_or(0)
        } else {
            0
        };
        self.viewport = ViewportState::new(self.surface.height(), pitch, self.margin);
    }
}
