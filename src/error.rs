//! Crate-level error types.

use std::fmt;

#[cfg(feature = "gpu")]
use crate::gpu::render_context::RenderContextError;

/// Errors produced by the detview crate.
///
/// Expected interactive outcomes (no camera, no hit, no overlay) are never
/// errors; they are modelled as `Option`s by the managers.
#[derive(Debug)]
pub enum ViewerError {
    /// GPU context initialization failure.
    #[cfg(feature = "gpu")]
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// WGSL shader composition or validation failure.
    Shader(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "gpu")]
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "gpu")]
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "gpu")]
impl From<RenderContextError> for ViewerError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
