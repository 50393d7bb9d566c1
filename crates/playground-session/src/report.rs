//! Bug report links for the swc issue tracker.

use url::Url;

use crate::error::{Result, SessionError};
use crate::state::SessionState;

/// New-issue form with the bug report template preselected.
pub const ISSUE_URL: &str =
    "https://github.com/swc-project/swc/issues/new?assignees=&labels=C-bug&template=bug_report.yml";

/// Longest code (in UTF-16 code units, as the issue form counts it)
/// embedded in a report link.
pub const MAX_REPORT_CODE_LENGTH: usize = 2000;

/// Builds the issue form link for `state`, with `share_link` as reproduction.
///
/// Code and configuration are embedded as readable text. Code longer than
/// [`MAX_REPORT_CODE_LENGTH`] is refused because the link would be cut off.
pub fn issue_report_url(state: &SessionState, share_link: &Url) -> Result<Url> {
    let length = state.code.encode_utf16().count();
    if length > MAX_REPORT_CODE_LENGTH {
        return Err(SessionError::CodeTooLong {
            length,
            limit: MAX_REPORT_CODE_LENGTH,
        });
    }

    let config = state
        .config
        .formatted()
        .unwrap_or_else(|_| state.config.text().to_string());

    let mut url = Url::parse(ISSUE_URL)?;
    url.query_pairs_mut()
        .append_pair("code", &state.code)
        .append_pair("config", &config)
        .append_pair("repro-link", share_link.as_str())
        .append_pair("version", &state.version.to_string());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_compiler::Version;

    fn state(code: &str) -> SessionState {
        let mut state = SessionState::new(Version::new(1, 7, 26));
        state.code = code.to_string();
        state
    }

    #[test]
    fn test_report_carries_readable_fields() {
        let share = Url::parse("https://play.swc.rs/?version=1.7.26&code=H4sI").unwrap();
        let url = issue_report_url(&state("const x = 1;"), &share).unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("template"), Some("bug_report.yml"));
        assert_eq!(get("labels"), Some("C-bug"));
        assert_eq!(get("code"), Some("const x = 1;"));
        assert_eq!(get("repro-link"), Some(share.as_str()));
        assert_eq!(get("version"), Some("1.7.26"));
        assert!(get("config").unwrap().contains("\n  \"jsc\": {"));
    }

    #[test]
    fn test_length_limit_counts_utf16_units() {
        let share = Url::parse("https://play.swc.rs/").unwrap();
        assert!(issue_report_url(&state(&"é".repeat(2000)), &share).is_ok());
        assert!(issue_report_url(&state(&"😀".repeat(1000)), &share).is_ok());

        let err = issue_report_url(&state(&"😀".repeat(1001)), &share).unwrap_err();
        assert!(matches!(err, SessionError::CodeTooLong { length: 2002, .. }));

        let err = issue_report_url(&state(&"x".repeat(2001)), &share).unwrap_err();
        assert!(matches!(
            err,
            SessionError::CodeTooLong {
                length: 2001,
                limit: 2000
            }
        ));
    }
}
