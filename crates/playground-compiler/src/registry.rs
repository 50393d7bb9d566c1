//! Published compiler versions, from the jsDelivr package API.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::{LoadError, Result};
use crate::package::{BINDING_CORE_WASM_PACKAGE, WASM_WEB_PACKAGE};
use crate::version::Version;

/// Default registry API root.
pub const DEFAULT_REGISTRY_URL: &str = "https://data.jsdelivr.com/v1/package/npm";

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!(
    "swc-playground/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/swc-project/swc-playground)"
);

/// One entry of the `versions` list; older API responses use plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum VersionEntry {
    Plain(String),
    Detailed { version: String },
}

impl VersionEntry {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(version) | Self::Detailed { version } => version,
        }
    }
}

/// Package metadata returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageInfo {
    /// Dist tags, e.g. `latest`.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

impl PackageInfo {
    /// The `latest` dist tag, if it is a valid version.
    #[must_use]
    pub fn latest(&self) -> Option<Version> {
        self.tags.get("latest").and_then(|tag| tag.parse().ok())
    }

    pub fn version_strings(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(VersionEntry::as_str)
    }
}

/// All selectable versions, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionIndex {
    pub versions: Vec<Version>,
    /// Latest release of the main package.
    pub latest: Option<Version>,
    pub fetched_at: DateTime<Utc>,
}

impl VersionIndex {
    #[must_use]
    pub fn contains(&self, version: &Version) -> bool {
        self.versions.binary_search_by(|probe| version.cmp(probe)).is_ok()
    }
}

/// Merges version lists: parses, removes duplicates, sorts newest first.
///
/// Strings that are not valid versions are skipped.
#[must_use]
pub fn merge_versions<'a>(lists: impl IntoIterator<Item = impl IntoIterator<Item = &'a str>>) -> Vec<Version> {
    let unique: BTreeSet<Version> = lists
        .into_iter()
        .flatten()
        .filter_map(|raw| match raw.parse() {
            Ok(version) => Some(version),
            Err(err) => {
                trace!("skipping version {raw:?}: {err}");
                None
            }
        })
        .collect();
    unique.into_iter().rev().collect()
}

/// Client for the package registry API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| LoadError::Network(format!("failed to create HTTP client: {e}")))?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches metadata for one package.
    pub async fn package(&self, name: &str) -> Result<PackageInfo> {
        let url = format!("{}/{}", self.base_url, name);
        debug!("Fetching package info from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound { url });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::Network(format!(
                "registry error ({status}): {body}"
            )));
        }

        let info: PackageInfo = response.json().await?;
        Ok(info)
    }

    /// Lists the versions of both compiler package names.
    pub async fn versions(&self) -> Result<VersionIndex> {
        let (web, binding) = tokio::try_join!(
            self.package(WASM_WEB_PACKAGE),
            self.package(BINDING_CORE_WASM_PACKAGE)
        )?;

        let versions = merge_versions([web.version_strings(), binding.version_strings()]);
        debug!(count = versions.len(), "merged version lists");

        Ok(VersionIndex {
            versions,
            latest: web.latest(),
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_package_info_shapes() {
        let plain: PackageInfo = serde_json::from_value(json!({
            "tags": { "latest": "1.7.26" },
            "versions": ["1.7.26", "1.7.25"]
        }))
        .unwrap();
        assert_eq!(plain.latest(), Some(Version::new(1, 7, 26)));

        let detailed: PackageInfo = serde_json::from_value(json!({
            "type": "npm",
            "name": "@swc/wasm-web",
            "tags": { "latest": "1.7.26", "nightly": "1.7.27-nightly-20240910.1" },
            "versions": [
                { "version": "1.7.26", "links": {} },
                { "version": "1.7.25", "links": {} }
            ]
        }))
        .unwrap();
        assert_eq!(
            detailed.version_strings().collect::<Vec<_>>(),
            vec!["1.7.26", "1.7.25"]
        );
    }

    #[test]
    fn test_merge_versions() {
        let merged = merge_versions([
            vec!["1.2.165", "1.7.26", "1.3.100-nightly-20231101.1", "bogus"],
            vec!["1.2.170", "1.2.165", "1.3.100"],
        ]);
        let rendered: Vec<String> = merged.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "1.7.26",
                "1.3.100",
                "1.3.100-nightly-20231101.1",
                "1.2.170",
                "1.2.165"
            ]
        );
    }

    #[test]
    fn test_index_contains() {
        let index = VersionIndex {
            versions: merge_versions([vec!["1.7.26", "1.2.170", "1.5.0"]]),
            latest: None,
            fetched_at: Utc::now(),
        };
        assert!(index.contains(&Version::new(1, 5, 0)));
        assert!(!index.contains(&Version::new(1, 5, 1)));
    }

    #[test]
    fn test_client_creation() {
        let client = RegistryClient::new(DEFAULT_REGISTRY_URL);
        assert!(client.is_ok());
    }
}
