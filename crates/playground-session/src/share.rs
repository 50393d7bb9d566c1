//! Share links: the session packed into URL query parameters.
//!
//! | Parameter     | Value                                  |
//! |---------------|----------------------------------------|
//! | `version`     | compiler version, verbatim             |
//! | `code`        | gzip + base64 of the source code       |
//! | `config`      | gzip + base64 of the compact config    |
//! | `strip-types` | present (without value) when enabled   |
//!
//! Any other query parameters of the page are kept.

use playground_compiler::Version;
use playground_config::{ConfigDocument, parse_jsonc};
use tracing::warn;
use url::Url;

use crate::codec::{decode_text, encode_text};
use crate::error::Result;
use crate::state::SessionState;

pub const CODE_PARAM: &str = "code";
pub const CONFIG_PARAM: &str = "config";
pub const VERSION_PARAM: &str = "version";
pub const STRIP_TYPES_PARAM: &str = "strip-types";

const SESSION_PARAMS: [&str; 4] = [VERSION_PARAM, CODE_PARAM, CONFIG_PARAM, STRIP_TYPES_PARAM];

/// Compact JSON for the configuration text.
///
/// Text that does not parse is shared as is.
#[must_use]
pub fn compact_config(config: &ConfigDocument) -> String {
    match parse_jsonc(config.text()) {
        Ok(value) => value.to_string(),
        Err(_) => config.text().to_string(),
    }
}

/// Builds the share link for `state` on top of `base`.
pub fn share_url(base: &Url, state: &SessionState) -> Result<Url> {
    let code = encode_text(CODE_PARAM, &state.code)?;
    let config = encode_text(CONFIG_PARAM, &compact_config(&state.config))?;

    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| !SESSION_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        query.extend_pairs(&kept);
        query.append_pair(VERSION_PARAM, &state.version.to_string());
        query.append_pair(CODE_PARAM, &code);
        query.append_pair(CONFIG_PARAM, &config);
        if state.strip_types {
            query.append_key_only(STRIP_TYPES_PARAM);
        }
    }
    Ok(url)
}

/// Session fields carried by a link. Absent or unreadable fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedSession {
    pub code: Option<String>,
    /// Configuration text exactly as decoded.
    pub config: Option<String>,
    pub version: Option<Version>,
    pub strip_types: bool,
}

impl SharedSession {
    /// Reads the session parameters of `url`.
    ///
    /// A parameter that cannot be decoded is logged and treated as absent.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let mut shared = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                CODE_PARAM if !value.is_empty() => {
                    shared.code = decode_or_warn(CODE_PARAM, &value);
                }
                CONFIG_PARAM if !value.is_empty() => {
                    shared.config = decode_or_warn(CONFIG_PARAM, &value);
                }
                VERSION_PARAM => match value.parse() {
                    Ok(version) => shared.version = Some(version),
                    Err(err) => warn!("ignoring shared version {value:?}: {err}"),
                },
                STRIP_TYPES_PARAM => shared.strip_types = true,
                _ => {}
            }
        }
        shared
    }

    /// Whether the link carries any session field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.config.is_none() && self.version.is_none() && !self.strip_types
    }
}

fn decode_or_warn(param: &'static str, value: &str) -> Option<String> {
    decode_text(param, value)
        .inspect_err(|err| warn!("ignoring shared {param}: {err}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SessionState {
        let mut state = SessionState::new(Version::new(1, 7, 26));
        state.code = "const x = 1;".to_string();
        state
    }

    #[test]
    fn test_share_url_parameters() {
        let base = Url::parse("https://play.swc.rs/").unwrap();
        let url = share_url(&base, &state()).unwrap();

        let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["version", "code", "config"]);
        assert!(url.as_str().contains("version=1.7.26"));
    }

    #[test]
    fn test_other_params_are_kept_and_old_ones_replaced() {
        let base = Url::parse("https://play.swc.rs/?theme=dark&code=stale&strip-types").unwrap();
        let url = share_url(&base, &state()).unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("theme".to_string(), "dark".to_string()));
        assert_eq!(pairs.iter().filter(|(k, _)| k == "code").count(), 1);
        assert!(!pairs.iter().any(|(k, _)| k == STRIP_TYPES_PARAM));
    }

    #[test]
    fn test_strip_types_flag_has_no_value() {
        let mut state = state();
        state.strip_types = true;
        let url = share_url(&Url::parse("https://play.swc.rs/").unwrap(), &state).unwrap();
        assert!(url.as_str().ends_with("&strip-types"));
        assert!(SharedSession::from_url(&url).strip_types);
    }

    #[test]
    fn test_config_is_shared_compact() {
        let state = state();
        let url = share_url(&Url::parse("https://play.swc.rs/").unwrap(), &state).unwrap();
        let shared = SharedSession::from_url(&url);

        let config = shared.config.unwrap();
        assert!(!config.contains('\n'));
        assert_eq!(
            parse_jsonc(&config).unwrap(),
            state.config.parse().unwrap()
        );
        assert_eq!(shared.code.as_deref(), Some("const x = 1;"));
        assert_eq!(shared.version, Some(Version::new(1, 7, 26)));
    }

    #[test]
    fn test_invalid_config_is_shared_verbatim() {
        assert_eq!(
            compact_config(&ConfigDocument::new("{ \"jsc\": ")),
            "{ \"jsc\": "
        );
    }

    #[test]
    fn test_unreadable_fields_are_dropped() {
        let url = Url::parse("https://play.swc.rs/?code=%%%&version=next&config=").unwrap();
        let shared = SharedSession::from_url(&url);
        assert_eq!(shared, SharedSession::default());
        assert!(shared.is_empty());
    }
}
