#![forbid(unsafe_code)]

//! Error taxonomy for the rendering core.
//!
//! Every operation surfaces the first error it detects; nothing here is
//! retried. The only condition recovered locally is a block that can never
//! fit the viewport, which is reported as
//! [`AppendOutcome::Dropped`](crate::context::AppendOutcome::Dropped) rather
//! than as an error.

use std::fmt;

/// Failure reported by a [`FontEngine`](crate::engine::FontEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EngineError {}

/// Errors produced by face loading, glyph caching, layout, and blitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A face could not be opened or a glyph could not be rasterized.
    Resource(String),
    /// The requested pixel size was rejected by the face.
    Size { point_size: u32, dpi: u32 },
    /// Input text is not valid UTF-8.
    Encoding { valid_up_to: usize },
    /// Content cannot satisfy the wrap/width constraint.
    Fit(FitReason),
    /// Allocation failed for a glyph buffer or surface buffer.
    Memory { bytes: usize },
    /// Negative bitmap pitch or an unrecognized pixel format.
    UnsupportedFormat(String),
    /// The operation needs an active face and none is loaded.
    NoFace,
}

/// Why a [`RenderError::Fit`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitReason {
    /// An explicit line break was found while wrapping is disallowed.
    BreakNotAllowed,
    /// The text needs a wrap while wrapping is disallowed.
    WrapNotAllowed,
    /// A single glyph is wider than the target width even on an empty line.
    GlyphTooWide { codepoint: char, advance: i32 },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(msg) => write!(f, "resource error: {msg}"),
            Self::Size { point_size, dpi } => {
                write!(f, "pixel size {point_size}pt at {dpi}dpi rejected by face")
            }
            Self::Encoding { valid_up_to } => {
                write!(f, "malformed UTF-8 after byte {valid_up_to}")
            }
            Self::Fit(FitReason::BreakNotAllowed) => {
                write!(f, "line break present but wrapping is disallowed")
            }
            Self::Fit(FitReason::WrapNotAllowed) => {
                write!(f, "text exceeds target width and wrapping is disallowed")
            }
            Self::Fit(FitReason::GlyphTooWide { codepoint, advance }) => write!(
                f,
                "glyph U+{:04X} (advance {advance}px) wider than target width",
                *codepoint as u32
            ),
            Self::Memory { bytes } => write!(f, "failed to allocate {bytes} bytes"),
            Self::UnsupportedFormat(msg) => write!(f, "unsupported format: {msg}"),
            Self::NoFace => write!(f, "no face loaded"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::str::Utf8Error> for RenderError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Encoding {
            valid_up_to: err.valid_up_to(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
