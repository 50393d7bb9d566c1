//! Rebuilding a session at startup.
//!
//! Each field is taken from the first source that has it: the share link,
//! then the local store, then the built-in defaults.

use playground_compiler::Version;
use playground_config::{ConfigDocument, format_json, parse_jsonc};
use tracing::{debug, info};

use crate::share::SharedSession;
use crate::state::SessionState;
use crate::storage::{CODE_KEY, CONFIG_KEY, KeyValueStore, load_or_warn};

/// Where a restored field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Link,
    Store,
    Default,
}

/// A restored session and the origin of its code and configuration.
#[derive(Debug, Clone)]
pub struct Restored {
    pub state: SessionState,
    pub code_origin: Origin,
    pub config_origin: Origin,
}

/// Normalizes stored or shared configuration text for the editor.
///
/// Text without an opening brace predates the JSON form and is used as is.
/// Anything else is pretty-printed, or kept verbatim when it does not parse.
#[must_use]
pub fn editor_config_text(text: &str) -> String {
    if !text.contains('{') {
        return text.to_string();
    }
    match parse_jsonc(text) {
        Ok(value) => format_json(&value),
        Err(err) => {
            debug!("keeping unparsable config text as is: {err}");
            text.to_string()
        }
    }
}

/// Restores a session from a share link, the local store and defaults.
pub fn restore(
    shared: &SharedSession,
    store: &dyn KeyValueStore,
    default_version: &Version,
) -> Restored {
    let (code, code_origin) = match &shared.code {
        Some(code) => (code.clone(), Origin::Link),
        None => match load_or_warn(store, CODE_KEY) {
            Some(code) => (code, Origin::Store),
            None => (String::new(), Origin::Default),
        },
    };

    let (config, config_origin) = match &shared.config {
        Some(text) => (ConfigDocument::new(editor_config_text(text)), Origin::Link),
        None => match load_or_warn(store, CONFIG_KEY) {
            Some(text) => (ConfigDocument::new(editor_config_text(&text)), Origin::Store),
            None => (ConfigDocument::default(), Origin::Default),
        },
    };

    let version = shared
        .version
        .clone()
        .unwrap_or_else(|| default_version.clone());

    let mut state = SessionState {
        code,
        config,
        version: version.clone(),
        strip_types: shared.strip_types,
    };
    // Clears a strip-types flag the version cannot honor.
    state.set_version(version);

    info!(
        version = %state.version,
        code = ?code_origin,
        config = ?config_origin,
        "restored session"
    );

    Restored {
        state,
        code_origin,
        config_origin,
    }
}
