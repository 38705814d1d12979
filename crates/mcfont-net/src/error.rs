//! Error types for the remote catalog.

use std::fmt;

use mcfont_core::AssetError;

/// Remote catalog errors.
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// HTTP request failed.
    Request(String),
    /// Invalid URL provided.
    InvalidUrl(String),
    /// Request timed out.
    Timeout,
    /// Connection refused or failed.
    Connection(String),
    /// JSON deserialization error.
    Json(String),
    /// HTTP error status (4xx or 5xx).
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },
    /// The version manifest has no entry with this id.
    UnknownVersion(String),
    /// A refresh of the same kind is already running.
    AlreadyFetching(&'static str),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(msg) => write!(f, "HTTP request error: {msg}"),
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Connection(msg) => write!(f, "Connection error: {msg}"),
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
            Self::HttpStatus { status, url } => write!(f, "HTTP {status} from {url}"),
            Self::UnknownVersion(id) => write!(f, "Unknown game version: {id}"),
            Self::AlreadyFetching(key) => write!(f, "Already fetching {key}"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_decode() {
            Self::Json(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl NetworkError {
    /// Convert into the catalog-level error for `path`.
    pub fn into_asset_error(self, path: &str) -> AssetError {
        match self {
            Self::HttpStatus { status: 404, .. } => AssetError::NotFound(path.to_string()),
            other => AssetError::Fetch {
                path: path.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// A specialized Result type for remote catalog operations.
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;
