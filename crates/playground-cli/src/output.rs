//! Terminal rendering of notices, version lists and compile output.

use std::io::{self, Write};

use playground_compiler::{Version, supports_strip_types};
use playground_session::{Notice, NoticeLevel};

/// One-line (or two-line) rendering of a notice.
#[must_use]
pub fn format_notice(notice: &Notice) -> String {
    let label = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    match &notice.description {
        Some(description) => format!("{label}: {}\n  {description}", notice.title),
        None => format!("{label}: {}", notice.title),
    }
}

/// Writes `text` followed by exactly one newline.
pub fn write_text(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// A row of the version listing.
#[must_use]
pub fn version_row(version: &Version, latest: Option<&Version>) -> String {
    let mut tags = Vec::new();
    if latest == Some(version) {
        tags.push("latest");
    }
    if supports_strip_types(version) {
        tags.push("strip-types");
    }
    if tags.is_empty() {
        version.to_string()
    } else {
        format!("{version} ({})", tags.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_with_description() {
        let notice = Notice::error("Failed to load swc.", "connection refused");
        assert_eq!(
            format_notice(&notice),
            "error: Failed to load swc.\n  connection refused"
        );
        assert_eq!(
            format_notice(&Notice::success("URL is copied to clipboard.")),
            "ok: URL is copied to clipboard."
        );
    }

    #[test]
    fn test_write_text_adds_single_newline() {
        let mut out = Vec::new();
        write_text(&mut out, "var a = 1;\n").unwrap();
        write_text(&mut out, "{}").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "var a = 1;\n{}\n");
    }

    #[test]
    fn test_version_rows() {
        let latest = Version::new(1, 7, 26);
        assert_eq!(
            version_row(&latest, Some(&latest)),
            "1.7.26 (latest, strip-types)"
        );
        assert_eq!(version_row(&Version::new(1, 3, 100), Some(&latest)), "1.3.100");
    }
}
