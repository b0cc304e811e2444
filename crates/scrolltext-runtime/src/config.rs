#![forbid(unsafe_code)]

//! Viewer configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Face used when none is configured.
pub const DEFAULT_FACE: &str = "/system/fonts/Roboto-Regular.ttf";

/// Screen density assumed when the host does not report one.
pub const DEFAULT_DPI: u32 = 480;

/// Text drawn by [`Viewer::tap`](crate::viewer::Viewer::tap).
pub const DEFAULT_TAP_TEXT: &str = "BRAVO, Mr. T.W.Lewis\nЭто по-русски\n";

/// Configuration for a [`Viewer`](crate::viewer::Viewer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Face file handed to the engine.
    pub face_path: PathBuf,
    /// Nominal face size in points.
    pub point_size: u32,
    /// Screen density in dots per inch.
    pub dpi: u32,
    /// Left edge of appended blocks; blocks wrap at `width - 2 * margin_x`.
    pub margin_x: usize,
    /// Rows kept free above and below the scrolling text area.
    pub margin_y: usize,
    /// Extra pixel rows between lines.
    pub line_gap: i32,
    /// Pause between produced blocks.
    pub interval: Duration,
    /// Text drawn at the tap position.
    pub tap_text: String,
    /// Wrap width for the tap text.
    pub tap_width: i32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            face_path: PathBuf::from(DEFAULT_FACE),
            point_size: 8,
            dpi: DEFAULT_DPI,
            margin_x: 10,
            margin_y: 250,
            line_gap: 10,
            interval: Duration::from_secs(1),
            tap_text: DEFAULT_TAP_TEXT.to_owned(),
            tap_width: 1000,
        }
    }
}

impl ViewerConfig {
    /// Set the face file.
    #[must_use]
    pub fn with_face(mut self, path: impl Into<PathBuf>) -> Self {
        self.face_path = path.into();
        self
    }

    /// Set the face size in points.
    #[must_use]
    pub fn with_point_size(mut self, point_size: u32) -> Self {
        self.point_size = point_size;
        self
    }

    /// Set the screen density. Zero falls back to [`DEFAULT_DPI`].
    #[must_use]
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = if dpi == 0 { DEFAULT_DPI } else { dpi };
        self
    }

    /// Set the horizontal and vertical margins.
    #[must_use]
    pub fn with_margins(mut self, margin_x: usize, margin_y: usize) -> Self {
        self.margin_x = margin_x;
        self.margin_y = margin_y;
        self
    }

    /// Set the gap between lines.
    #[must_use]
    pub fn with_line_gap(mut self, line_gap: i32) -> Self {
        self.line_gap = line_gap;
        self
    }

    /// Set the pause between produced blocks.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the tap text and its wrap width.
    #[must_use]
    pub fn with_tap_text(mut self, text: impl Into<String>, width: i32) -> Self {
        self.tap_text = text.into();
        self.tap_width = width;
        self
    }

    /// Wrap width for appended blocks on a surface `surface_width` pixels wide.
    #[must_use]
    pub fn block_width(&self, surface_width: usize) -> i32 {
        let width = surface_width.saturating_sub(self.margin_x.saturating_mul(2));
        i32::try_from(width).unwrap_or(i32::MAX)
    }

    /// X origin of appended blocks.
    #[must_use]
    pub fn block_origin_x(&self) -> i32 {
        i32::try_from(self.margin_x).unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_layout() {
        let config = ViewerConfig::default();
        assert_eq!(config.point_size, 8);
        assert_eq!(config.dpi, 480);
        assert_eq!((config.margin_x, config.margin_y), (10, 250));
        assert_eq!(config.line_gap, 10);
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.tap_width, 1000);
    }

    #[test]
    fn zero_dpi_falls_back() {
        assert_eq!(ViewerConfig::default().with_dpi(0).dpi, DEFAULT_DPI);
        assert_eq!(ViewerConfig::default().with_dpi(160).dpi, 160);
    }

    #[test]
    fn block_width_excludes_both_margins() {
        let config = ViewerConfig::default();
        assert_eq!(config.block_width(1080), 1060);
        assert_eq!(config.block_width(15), 0);
        assert_eq!(config.block_origin_x(), 10);
    }
}
