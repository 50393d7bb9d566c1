//! Session error types.

use std::path::PathBuf;

use playground_config::ConfigError;
use thiserror::Error;

/// Errors raised while encoding, decoding or persisting a session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// A share parameter is not valid base64.
    #[error("invalid base64 in `{param}` parameter")]
    Base64 {
        param: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    /// Gzip compression or decompression failed.
    #[error("failed to {operation} `{param}` parameter")]
    Compression {
        operation: &'static str,
        param: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Decompressed bytes are not UTF-8 text.
    #[error("`{param}` parameter is not UTF-8 text")]
    Utf8 {
        param: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A URL could not be parsed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The configuration text could not be applied.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Code is too long to be embedded in an issue report.
    #[error("code is {length} characters long (limit: {limit})")]
    CodeTooLong { length: usize, limit: usize },

    /// File I/O error in the persisted store.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Base64 { param, .. } | Self::Compression { param, .. } | Self::Utf8 { param, .. } => {
                format!("The shared {param} in this link could not be read.")
            }
            Self::Url(_) => "The link is not a valid URL.".to_string(),
            Self::Config(err) => err.user_message().to_string(),
            Self::CodeTooLong { .. } => {
                "Your input is too large to share. Please copy the code and paste it into the issue."
                    .to_string()
            }
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
        }
    }
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
