//! The session: what the user is editing and which compiler runs it.

use playground_compiler::{Version, supports_strip_types};
use playground_config::ConfigDocument;

/// Code, configuration, compiler version and output mode of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Source code in the input editor.
    pub code: String,
    /// Configuration text (JSON with comments).
    pub config: ConfigDocument,
    /// Selected compiler version.
    pub version: Version,
    /// Show type-stripped output instead of the full transform.
    pub strip_types: bool,
}

impl SessionState {
    /// Empty code and the default configuration for `version`.
    #[must_use]
    pub fn new(version: Version) -> Self {
        Self {
            code: String::new(),
            config: ConfigDocument::default(),
            version,
            strip_types: false,
        }
    }

    /// Whether the strip-types mode is in effect.
    ///
    /// The flag is only honored by versions that ship a type-stripping module.
    #[must_use]
    pub fn strip_types_active(&self) -> bool {
        self.strip_types && supports_strip_types(&self.version)
    }

    /// Changes the version, clearing the strip-types flag when the new
    /// version cannot strip types.
    pub fn set_version(&mut self, version: Version) {
        if !supports_strip_types(&version) {
            self.strip_types = false;
        }
        self.version = version;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_change_clears_strip_types() {
        let mut state = SessionState::new(Version::new(1, 7, 26));
        state.strip_types = true;
        assert!(state.strip_types_active());

        state.set_version(Version::new(1, 7, 1));
        assert!(state.strip_types);

        state.set_version(Version::new(1, 7, 0));
        assert!(!state.strip_types);
        assert!(!state.strip_types_active());
    }

    #[test]
    fn test_flag_ignored_on_old_versions() {
        let mut state = SessionState::new(Version::new(1, 6, 0));
        state.strip_types = true;
        assert!(!state.strip_types_active());
    }
}
