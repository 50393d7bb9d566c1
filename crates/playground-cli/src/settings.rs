//! Settings file for the command-line front-end.
//!
//! Settings are stored in the platform-specific configuration folder:
//! - macOS: ~/Library/Application Support/rs.swc.SWC Playground/
//! - Windows: %APPDATA%/swc/SWC Playground/config/
//! - Linux: ~/.config/swcplayground/

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use playground_compiler::loader::DEFAULT_CDN_URL;
use playground_compiler::registry::DEFAULT_REGISTRY_URL;
use playground_compiler::{LoaderConfig, Version};
use serde::{Deserialize, Serialize};

const APP_QUALIFIER: &str = "rs";
const APP_ORG: &str = "swc";
const APP_NAME: &str = "SWC Playground";
const CONFIG_FILENAME: &str = "settings.toml";

/// Environment variable overriding [`Settings::default_version`].
pub const VERSION_ENV: &str = "SWC_PLAYGROUND_VERSION";

/// Compiler version used when neither a share link nor `--swc` names one.
pub const DEFAULT_VERSION: &str = "1.7.26";

/// Address share links are built on.
pub const DEFAULT_PAGE_URL: &str = "https://play.swc.rs/";

/// Settings (persisted to disk as TOML).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Compiler version for new sessions.
    pub default_version: String,
    /// Base address of share links.
    pub page_url: String,
    /// CDN root serving the compiler packages.
    pub cdn_url: String,
    /// Package registry API root.
    pub registry_url: String,
    /// Node.js executable used to host the compiler modules.
    pub node_path: PathBuf,
    /// Download cache; platform cache folder when unset.
    pub cache_dir: Option<PathBuf>,
    /// Home of the saved session; platform data folder when unset.
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_VERSION.to_string(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            node_path: PathBuf::from("node"),
            cache_dir: None,
            data_dir: None,
        }
    }
}

impl Settings {
    /// Applies environment overrides.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if let Ok(version) = std::env::var(VERSION_ENV)
            && !version.trim().is_empty()
        {
            self.default_version = version.trim().to_string();
        }
        self
    }

    /// The default compiler version, falling back to the built-in one when
    /// the configured value is not a version.
    #[must_use]
    pub fn version(&self) -> Version {
        match self.default_version.parse() {
            Ok(version) => version,
            Err(err) => {
                tracing::warn!(
                    "default version {:?} is invalid ({err}), using {DEFAULT_VERSION}",
                    self.default_version
                );
                Version::new(1, 7, 26)
            }
        }
    }

    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            project_dirs().map_or_else(
                || std::env::temp_dir().join("swc-playground").join("cache"),
                |dirs| dirs.cache_dir().to_path_buf(),
            )
        })
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            project_dirs().map_or_else(
                || std::env::temp_dir().join("swc-playground").join("data"),
                |dirs| dirs.data_dir().to_path_buf(),
            )
        })
    }

    #[must_use]
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            cdn_url: self.cdn_url.clone(),
            cache_dir: self.cache_dir(),
            node_path: self.node_path.clone(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Get the path to the settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings from `path`, or the platform settings file.
///
/// Returns default settings if:
/// - The settings file doesn't exist
/// - The settings file cannot be parsed
/// - The platform-specific directory cannot be determined
pub fn load_settings(path: Option<&Path>) -> Settings {
    let Some(path) = path.map(Path::to_path_buf).or_else(settings_path) else {
        tracing::warn!("Could not determine settings path, using defaults");
        return Settings::default();
    };

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings file: {}, using defaults", e);
                Settings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No settings file found at {:?}, using defaults", path);
            Settings::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read settings file: {}, using defaults", e);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_path_exists() {
        let path = settings_path();
        assert!(path.is_some());
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = Settings {
            cache_dir: Some(PathBuf::from("/tmp/swc-cache")),
            ..Settings::default()
        };
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Settings = toml::from_str("default_version = \"1.3.100\"").unwrap();
        assert_eq!(parsed.default_version, "1.3.100");
        assert_eq!(parsed.cdn_url, DEFAULT_CDN_URL);
        assert_eq!(parsed.node_path, PathBuf::from("node"));
    }

    #[test]
    fn test_invalid_version_falls_back() {
        let settings = Settings {
            default_version: "latest".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.version(), Version::new(1, 7, 26));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(Some(&dir.path().join("settings.toml")));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_loader_config_uses_overrides() {
        let settings = Settings {
            cdn_url: "https://unpkg.com".to_string(),
            cache_dir: Some(PathBuf::from("/var/cache/swc")),
            ..Settings::default()
        };
        let config = settings.loader_config();
        assert_eq!(config.cdn_url, "https://unpkg.com");
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/swc"));
    }
}
