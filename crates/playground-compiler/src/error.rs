//! Error types for loading compiler modules.

use thiserror::Error;

/// Errors that can occur while resolving, fetching or initializing a compiler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// Failed to parse version string.
    #[error("invalid version format: {0}")]
    InvalidVersion(String),

    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The CDN or registry has no such file.
    #[error("not found: {url}")]
    NotFound {
        /// Requested URL.
        url: String,
    },

    /// A cached artifact does not match its recorded SHA256 digest.
    #[error("checksum verification failed for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Artifact file name.
        file: String,
        /// Digest recorded in the cache manifest.
        expected: String,
        /// Digest of the bytes on disk.
        actual: String,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(String),

    /// Failed to parse JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The JavaScript runtime could not be started or broke its protocol.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// The module's initializer threw.
    #[error("failed to initialize swc {version}: {message}")]
    Initialization {
        /// Version being initialized.
        version: String,
        /// Normalized error text from the initializer.
        message: String,
    },
}

impl LoadError {
    /// Returns a user-friendly error message suitable for a notification.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the CDN. Please check your internet connection.",
            Self::NotFound { .. } => "This swc version is not available on the CDN.",
            Self::ChecksumMismatch { .. } => {
                "A cached compiler file is corrupted. It will be downloaded again."
            }
            Self::Runtime(_) => "Could not start the JavaScript runtime. Is Node.js installed?",
            Self::Initialization { .. } => "Failed to load swc.",
            Self::InvalidVersion(_) => "The selected swc version is not a valid version.",
            Self::Io(_) | Self::JsonParse(_) => "An unexpected error occurred.",
        }
    }

    /// Returns whether this error is potentially recoverable with a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::ChecksumMismatch { .. } | Self::Io(_)
        )
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
