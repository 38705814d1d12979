//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur while decoding, encoding or compositing images.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Image data could not be decoded.
    #[error("failed to load image: {0}")]
    ImageLoad(String),

    /// Image data could not be encoded.
    #[error("failed to save image: {0}")]
    ImageSave(String),

    /// A glyph archive could not be read.
    #[error("failed to read archive: {0}")]
    Archive(String),

    /// Invalid surface dimensions (zero width or height).
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
