#![forbid(unsafe_code)]

use std::fmt;

use scrolltext_render::RenderError;

use crate::present::PresentError;

/// Errors surfaced by the viewer and its producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    Render(RenderError),
    Present(PresentError),
    /// A thread panicked while holding the scene lock.
    Poisoned,
    /// The producer thread could not be started.
    Spawn(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(err) => write!(f, "render: {err}"),
            Self::Present(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "scene lock poisoned"),
            Self::Spawn(msg) => write!(f, "failed to spawn producer: {msg}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(err) => Some(err),
            Self::Present(err) => Some(err),
            Self::Poisoned | Self::Spawn(_) => None,
        }
    }
}

impl From<RenderError> for ViewerError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

impl From<PresentError> for ViewerError {
    fn from(err: PresentError) -> Self {
        Self::Present(err)
    }
}
