#![forbid(unsafe_code)]

//! Presentation of finished frames.
//!
//! A [`Presenter`] receives the surface while the scene lock is held and must
//! copy what it needs before returning. [`HeadlessPresenter`] keeps the last
//! frame in memory and can export it as a binary PPM image.

use std::fmt;
use std::io::{self, Write};

use scrolltext_render::{PixelFormat, PixelSurface};
use tracing::trace;

/// Failure reported by a [`Presenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentError {
    message: String,
}

impl PresentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "present failed: {}", self.message)
    }
}

impl std::error::Error for PresentError {}

/// Host-side display target.
pub trait Presenter {
    /// Copy `surface` to the display.
    fn present(&mut self, surface: &PixelSurface) -> Result<(), PresentError>;
}

/// In-memory presenter for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPresenter {
    width: usize,
    height: usize,
    format: Option<PixelFormat>,
    frame: Vec<u8>,
    frames: u64,
}

impl HeadlessPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Last frame, rows tightly packed (no stride padding).
    #[must_use]
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn format(&self) -> Option<PixelFormat> {
        self.format
    }

    /// Last frame as 8-bit RGB triples.
    #[must_use]
    pub fn to_rgb(&self) -> Vec<u8> {
        let Some(format) = self.format else {
            return Vec::new();
        };
        let mut rgb = Vec::with_capacity(self.width * self.height * 3);
        match format {
            PixelFormat::Rgba8888 => {
                for px in self.frame.chunks_exact(4) {
                    rgb.extend_from_slice(&px[..3]);
                }
            }
            PixelFormat::Rgb565 => {
                for px in self.frame.chunks_exact(2) {
                    let v = u16::from_le_bytes([px[0], px[1]]);
                    let r = ((v >> 11) & 0x1F) as u8;
                    let g = ((v >> 5) & 0x3F) as u8;
                    let b = (v & 0x1F) as u8;
                    rgb.extend_from_slice(&[r << 3 | r >> 2, g << 2 | g >> 4, b << 3 | b >> 2]);
                }
            }
        }
        rgb
    }

    /// Write the last frame as a binary PPM (`P6`) image.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        out.write_all(&self.to_rgb())?;
        out.flush()
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, surface: &PixelSurface) -> Result<(), PresentError> {
        let row_bytes = surface.width() * surface.format().bytes_per_pixel();
        let len = row_bytes * surface.height();
        self.frame.clear();
        self.frame
            .try_reserve_exact(len)
            .map_err(|_| PresentError::new(format!("cannot allocate {len} bytes")))?;
        self.frame.resize(len, 0);
        surface.copy_to(&mut self.frame, row_bytes);

        self.width = surface.width();
        self.height = surface.height();
        self.format = Some(surface.format());
        self.frames += 1;
        trace!(frame = self.frames, width = self.width, height = self.height, "frame presented");
        Ok(())
    }
}
