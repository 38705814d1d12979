//! Error types for the preview pipeline.

use mcfont_render::ValidationError;
use thiserror::Error;

/// Why a preview could not be produced.
///
/// Every variant renders as a message fit to show in place of the preview.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    /// No font descriptor is selected.
    #[error("No base file selected")]
    NoBaseFile,

    /// The selected descriptor is not in the blob store.
    #[error("Base file {0} does not exist")]
    MissingBaseFile(String),

    /// The descriptor is not valid JSON.
    #[error("Failed to parse {0}")]
    ParseFailed(String),

    /// The descriptor is JSON but not a valid font.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The descriptor passed validation but could not be decoded.
    #[error("Failed to decode {path}: {message}")]
    Decode {
        /// Storage path of the descriptor.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// Text components could not be serialized.
    #[error("Failed to encode command: {0}")]
    Encode(String),
}

/// Result type for preview operations.
pub type PreviewResult<T> = Result<T, PreviewError>;
