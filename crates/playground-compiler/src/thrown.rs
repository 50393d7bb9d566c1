//! Values thrown by compiler modules and their normalized form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::LoadError;

/// Text used when a thrown value renders as nothing.
pub const UNKNOWN_ERROR: &str = "Unknown error";
/// Text shown while the selected compiler is still loading.
pub const LOADING_MESSAGE: &str = "Loading swc...";

/// A value thrown by a module call, as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Thrown {
    /// A thrown string.
    String { value: String },
    /// A thrown error object.
    Error {
        /// The error's string form, e.g. `"Error: unexpected token"`.
        display: String,
        /// Stack trace, when the runtime recorded one.
        #[serde(default)]
        stack: Option<String>,
    },
    /// Anything else, already coerced to a string by the runtime.
    Other { value: String },
}

impl Thrown {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String {
            value: value.into(),
        }
    }

    pub fn error(display: impl Into<String>, stack: Option<String>) -> Self {
        Self::Error {
            display: display.into(),
            stack,
        }
    }

    pub fn other(value: impl Into<String>) -> Self {
        Self::Other {
            value: value.into(),
        }
    }
}

/// Normalizes a thrown value into display text. Never returns an empty string.
#[must_use]
pub fn normalize_thrown(thrown: &Thrown) -> String {
    let text = match thrown {
        Thrown::String { value } | Thrown::Other { value } => value.clone(),
        Thrown::Error {
            display,
            stack: Some(stack),
        } if !stack.is_empty() => format!("{display}\n\n{stack}"),
        Thrown::Error { display, .. } => display.clone(),
    };
    non_empty(text)
}

fn non_empty(text: String) -> String {
    if text.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        text
    }
}

/// A compile call that did not produce output.
///
/// Carries the normalized error text shown in the output pane.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
    message: String,
}

impl CompileError {
    /// Error with the given text; empty text is replaced by [`UNKNOWN_ERROR`].
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: non_empty(message.into()),
        }
    }

    /// The compiler for the selected version is not ready yet.
    #[must_use]
    pub fn loading() -> Self {
        Self::new(LOADING_MESSAGE)
    }

    /// The compiler for the selected version failed to load.
    #[must_use]
    pub fn unavailable(err: &LoadError) -> Self {
        Self::new(err.to_string())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn into_message(self) -> String {
        self.message
    }
}

impl From<Thrown> for CompileError {
    fn from(thrown: Thrown) -> Self {
        Self {
            message: normalize_thrown(&thrown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_is_unchanged() {
        let text = normalize_thrown(&Thrown::string("x\n  --> input.js:1:1"));
        assert_eq!(text, "x\n  --> input.js:1:1");
    }

    #[test]
    fn test_error_with_stack() {
        let thrown = Thrown::error("Error: boom", Some("Error: boom\n    at foo".to_string()));
        assert_eq!(normalize_thrown(&thrown), "Error: boom\n\nError: boom\n    at foo");
    }

    #[test]
    fn test_error_without_stack() {
        assert_eq!(normalize_thrown(&Thrown::error("Error: boom", None)), "Error: boom");
        assert_eq!(
            normalize_thrown(&Thrown::error("Error: boom", Some(String::new()))),
            "Error: boom"
        );
    }

    #[test]
    fn test_other_is_coerced() {
        assert_eq!(normalize_thrown(&Thrown::other("42")), "42");
        assert_eq!(normalize_thrown(&Thrown::other("[object Object]")), "[object Object]");
    }

    #[test]
    fn test_never_empty() {
        assert_eq!(normalize_thrown(&Thrown::string("")), UNKNOWN_ERROR);
        assert_eq!(normalize_thrown(&Thrown::error("", None)), UNKNOWN_ERROR);
        assert_eq!(CompileError::new("").message(), UNKNOWN_ERROR);
        assert_eq!(CompileError::new(" ").message(), " ");
    }

    #[test]
    fn test_deserialize_from_runtime() {
        let thrown: Thrown =
            serde_json::from_str(r#"{"kind":"error","display":"Error: x","stack":null}"#).unwrap();
        assert_eq!(thrown, Thrown::error("Error: x", None));

        let thrown: Thrown = serde_json::from_str(r#"{"kind":"string","value":"oops"}"#).unwrap();
        assert_eq!(CompileError::from(thrown).message(), "oops");
    }

    #[test]
    fn test_loading_and_unavailable() {
        assert_eq!(CompileError::loading().to_string(), LOADING_MESSAGE);

        let err = LoadError::Network("offline".to_string());
        assert_eq!(CompileError::unavailable(&err).message(), "network error: offline");
    }
}
