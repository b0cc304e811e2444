#![forbid(unsafe_code)]

//! Software pixel surface in one of two packed formats.
//!
//! The surface is a row-major byte buffer of `height * stride` pixels; `stride`
//! may exceed `width` to match the host's row alignment. Only the first
//! `width` pixels of a row are visible. Pixels are stored little-endian.

use tracing::debug;

use crate::error::{RenderError, Result};

/// Pixel layout of a [`PixelSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 32-bit, bytes `R, G, B, A`.
    Rgba8888,
    /// 16-bit, 5/6/5 bits of red/green/blue (blue in the low bits).
    Rgb565,
}

impl PixelFormat {
    /// Host format code for 32-bit RGBA.
    pub const RAW_RGBA_8888: i32 = 1;
    /// Host format code for 16-bit RGB 5/6/5.
    pub const RAW_RGB_565: i32 = 4;

    /// Map a host window format code to a supported format.
    pub fn from_raw(code: i32) -> Result<Self> {
        match code {
            Self::RAW_RGBA_8888 => Ok(Self::Rgba8888),
            Self::RAW_RGB_565 => Ok(Self::Rgb565),
            other => Err(RenderError::UnsupportedFormat(format!(
                "pixel format code {other}"
            ))),
        }
    }

    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8888 => 4,
            Self::Rgb565 => 2,
        }
    }
}

/// Pack a coverage value as an opaque gray RGBA pixel (`R = G = B = v`).
#[inline]
#[must_use]
pub const fn pack_rgba8888(v: u8) -> [u8; 4] {
    [v, v, v, 0xFF]
}

/// Pack a coverage value as a 5/6/5 gray.
///
/// The 5-bit value `v >> 3` is placed in the red and blue fields and shifted
/// into the top five bits of the green field, without per-channel scaling.
/// The result is a dim approximation of gray that matches the legacy output.
#[inline]
#[must_use]
pub const fn pack_rgb565(v: u8) -> u16 {
    let g = (v >> 3) as u16;
    g | (g << 6) | (g << 11)
}

/// Owned pixel buffer with host-supplied geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelSurface {
    /// Allocate a zeroed surface. `stride` is in pixels and must be at least
    /// `width`.
    pub fn new(width: usize, height: usize, stride: usize, format: PixelFormat) -> Result<Self> {
        if stride < width {
            return Err(RenderError::UnsupportedFormat(format!(
                "stride {stride} narrower than width {width}"
            )));
        }
        let len = height
            .checked_mul(stride)
            .and_then(|px| px.checked_mul(format.bytes_per_pixel()))
            .ok_or(RenderError::Memory { bytes: usize::MAX })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| RenderError::Memory { bytes: len })?;
        data.resize(len, 0);
        debug!(width, height, stride, ?format, bytes = len, "surface allocated");

        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row length in pixels, including padding.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Row length in bytes, including padding.
    #[must_use]
    pub fn row_bytes(&self) -> usize {
        self.stride * self.format.bytes_per_pixel()
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Overwrite pixel `(x, y)` with coverage `v` packed for this format.
    /// Out-of-bounds coordinates are ignored.
    #[inline]
    pub fn put_coverage(&mut self, x: usize, y: usize, v: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let off = (y * self.stride + x) * bpp;
        match self.format {
            PixelFormat::Rgba8888 => {
                self.data[off..off + 4].copy_from_slice(&pack_rgba8888(v));
            }
            PixelFormat::Rgb565 => {
                self.data[off..off + 2].copy_from_slice(&pack_rgb565(v).to_le_bytes());
            }
        }
    }

    /// Raw packed value of pixel `(x, y)`: the little-endian `u32` for
    /// RGBA, the `u16` widened for 5/6/5.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let off = (y * self.stride + x) * bpp;
        let px = &self.data[off..off + bpp];
        Some(match self.format {
            PixelFormat::Rgba8888 => u32::from_le_bytes([px[0], px[1], px[2], px[3]]),
            PixelFormat::Rgb565 => u32::from(u16::from_le_bytes([px[0], px[1]])),
        })
    }

    /// Zero the whole buffer.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Zero `count` rows starting at `start`, clamped to the surface.
    pub fn clear_rows(&mut self, start: usize, count: usize) {
        let row_bytes = self.row_bytes();
        let start = start.min(self.height);
        let end = start.saturating_add(count).min(self.height);
        self.data[start * row_bytes..end * row_bytes].fill(0);
    }

    /// Move `count` rows from `src` to `dst` in place (regions may overlap),
    /// clamped to the surface.
    pub fn move_rows(&mut self, src: usize, dst: usize, count: usize) {
        if src >= self.height || dst >= self.height {
            return;
        }
        let count = count.min(self.height - src).min(self.height - dst);
        let row_bytes = self.row_bytes();
        self.data.copy_within(
            src * row_bytes..(src + count) * row_bytes,
            dst * row_bytes,
        );
    }

    /// Copy the visible part of every row into `dst`, whose rows are
    /// `dst_row_bytes` apart. Returns the number of rows copied.
    pub fn copy_to(&self, dst: &mut [u8], dst_row_bytes: usize) -> usize {
        let visible = self.width * self.format.bytes_per_pixel();
        if dst_row_bytes < visible {
            return 0;
        }
        let row_bytes = self.row_bytes();
        let mut copied = 0;
        for (y, src_row) in self.data.chunks_exact(row_bytes.max(1)).enumerate() {
            let start = y * dst_row_bytes;
            let Some(dst_row) = dst.get_mut(start..start + visible) else {
                break;
            };
            dst_row.copy_from_slice(&src_row[..visible]);
            copied += 1;
        }
        copied
    }
}
