//! Configuration error types.

use thiserror::Error;

/// Errors raised while reading or editing configuration text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The text is not valid JSON (comments and trailing commas are allowed).
    #[error("invalid configuration syntax: {0}")]
    Syntax(String),

    /// The text is valid JSON but does not have the shape of a compiler config.
    #[error("invalid configuration shape: {0}")]
    Shape(#[from] serde_json::Error),

    /// A structured edit walked into a value that is not an object.
    #[error("cannot edit `{path}`: parent is not an object")]
    NotAnObject {
        /// Dotted path of the value that was being edited.
        path: String,
    },
}

impl ConfigError {
    /// Returns a short message suitable for a transient notification.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Syntax(_) => "The configuration is not valid JSON.",
            Self::Shape(_) => "The configuration does not match the expected options.",
            Self::NotAnObject { .. } => "The configuration could not be updated.",
        }
    }
}

impl From<json5::Error> for ConfigError {
    fn from(err: json5::Error) -> Self {
        Self::Syntax(err.to_string())
    }
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
