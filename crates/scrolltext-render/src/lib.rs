#![forbid(unsafe_code)]

//! Software text rendering core: glyph cache, character wrap, pixel blitter,
//! and a scrolling viewport.
//!
//! # Role in scrolltext
//! `scrolltext-render` turns strings into pixels. It owns no threads and does
//! no I/O beyond reading face files through the injected engine;
//! `scrolltext-runtime` drives it from a producer thread and input events.
//!
//! # Primary responsibilities
//! - **FaceManager**: the single active face and its pixel metrics.
//! - **GlyphCache**: per-codepoint coverage bitmaps for that face.
//! - **layout**: the one wrap routine shared by line counting and drawing.
//! - **Blitter**: coverage to `Rgba8888` / `Rgb565` pixels, clipped.
//! - **ViewportState**: in-place scrolling of a bounded text area.
//! - **RenderContext**: owns all of the above plus the [`PixelSurface`].
//!
//! # Engines
//! [`FontEngine`] is the rasterization seam. [`BlockFont`] draws procedural
//! boxes and needs no font file; `FontdueEngine` (feature `fontdue`, on by
//! default) reads TrueType and OpenType faces.

pub mod blit;
pub mod block_font;
pub mod context;
pub mod engine;
pub mod error;
pub mod face;
#[cfg(feature = "fontdue")]
pub mod fontdue_engine;
pub mod glyph_cache;
pub mod layout;
pub mod surface;
pub mod viewport;

pub use blit::Blitter;
pub use block_font::BlockFont;
pub use context::{AppendOutcome, RenderContext};
pub use engine::{DesignMetrics, FontEngine, RasterGlyph};
pub use error::{EngineError, FitReason, RenderError, Result};
pub use face::{Face, FaceManager, design_to_screen};
#[cfg(feature = "fontdue")]
pub use fontdue_engine::{FontdueEngine, FontdueFace};
pub use glyph_cache::{GlyphBitmap, GlyphCache, GlyphCacheStats};
pub use layout::{LayoutEvent, LineBreak, compute_lines, layout};
pub use surface::{PixelFormat, PixelSurface, pack_rgb565, pack_rgba8888};
pub use viewport::{AppendPlan, ViewportState};
