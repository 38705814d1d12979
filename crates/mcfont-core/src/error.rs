//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur while locating or fetching assets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The path is neither in the blob store nor in the asset catalog.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The catalog knows the path but fetching it failed.
    #[error("failed to fetch asset {path}: {message}")]
    Fetch {
        /// Path of the asset.
        path: String,
        /// Description of the failure.
        message: String,
    },
}

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors produced by blob-store file name validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileNameError {
    /// A file or folder with this name is already stored.
    #[error("a file or folder with the name {0} already exists")]
    AlreadyExists(String),

    /// The extension is not one of the allowed file types.
    #[error("disallowed file type {extension}, only {allowed} are allowed")]
    DisallowedType {
        /// The rejected extension.
        extension: String,
        /// Comma-separated list of allowed extensions.
        allowed: String,
    },
}

/// Errors that can occur while loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON configuration could not be parsed or written.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed.
    #[error("invalid TOML configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML configuration could not be written.
    #[error("failed to serialize TOML configuration: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
