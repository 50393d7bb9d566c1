//! Source locations extracted from compiler error text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// `error: <message>` followed by a ` --> <file>:<line>:<column>` line.
static DIAGNOSTIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)error:\s(.+?)\n\s-->\s.+?:(\d+):(\d+)")
        .expect("Invalid diagnostic regex")
});

/// Terminal escape sequences (CSI).
static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("Invalid ANSI regex")
});

/// Removes ANSI color and cursor sequences.
#[must_use]
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_RE.replace_all(text, "")
}

/// One located error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

/// Extracts every located error from compiler error text.
///
/// Escape sequences are removed first. Matches with out-of-range numbers
/// are skipped.
#[must_use]
pub fn extract_diagnostics(text: &str) -> Vec<Diagnostic> {
    let plain = strip_ansi(text);
    DIAGNOSTIC_RE
        .captures_iter(&plain)
        .filter_map(|caps| {
            Some(Diagnostic {
                message: caps.get(1)?.as_str().to_string(),
                line: caps.get(2)?.as_str().parse().ok()?,
                column: caps.get(3)?.as_str().parse().ok()?,
            })
        })
        .collect()
}

/// Marker severity understood by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// An editor marker covering a single position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorMarker {
    pub source: &'static str,
    pub severity: Severity,
    pub message: String,
    pub start_line_number: u32,
    pub start_column: u32,
    pub end_line_number: u32,
    pub end_column: u32,
}

impl From<Diagnostic> for EditorMarker {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            source: "swc",
            severity: Severity::Error,
            message: diagnostic.message,
            start_line_number: diagnostic.line,
            start_column: diagnostic.column,
            end_line_number: diagnostic.line,
            end_column: diagnostic.column,
        }
    }
}

/// Editor markers for compiler error text.
#[must_use]
pub fn editor_markers(text: &str) -> Vec<EditorMarker> {
    extract_diagnostics(text)
        .into_iter()
        .map(EditorMarker::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYNTAX_ERROR: &str = "\u{1b}[38;5;9m\u{1b}[1mx\u{1b}[0m Expression expected\n   ,-[input.js:1:1]\n";

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\u{1b}[31merror\u{1b}[0m: x"), "error: x");
        assert_eq!(strip_ansi("plain"), "plain");
        assert!(matches!(strip_ansi("plain"), Cow::Borrowed(_)));
        assert!(!strip_ansi(SYNTAX_ERROR).contains('\u{1b}'));
    }

    #[test]
    fn test_extract_diagnostics() {
        let text = "error: Expression expected\n --> input.js:1:11\n  |\n1 | const x = ;\n";
        assert_eq!(
            extract_diagnostics(text),
            vec![Diagnostic {
                message: "Expression expected".to_string(),
                line: 1,
                column: 11
            }]
        );
    }

    #[test]
    fn test_extract_multiple_with_colors() {
        let text = "\u{1b}[31merror\u{1b}[0m: first\n --> input.ts:2:3\n\nerror: second\n --> input.ts:10:1\n";
        let found = extract_diagnostics(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].message, "second");
        assert_eq!((found[1].line, found[1].column), (10, 1));
    }

    #[test]
    fn test_no_location() {
        assert!(extract_diagnostics("Error: boom\n\n    at foo").is_empty());
    }

    #[test]
    fn test_markers_cover_single_position() {
        let markers = editor_markers("error: oops\n --> input.js:3:7\n");
        assert_eq!(markers.len(), 1);
        let marker = &markers[0];
        assert_eq!(marker.severity, Severity::Error);
        assert_eq!((marker.start_line_number, marker.start_column), (3, 7));
        assert_eq!((marker.end_line_number, marker.end_column), (3, 7));
    }
}
