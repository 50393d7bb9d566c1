//! Loader that fetches compiler packages from the jsDelivr CDN.

use std::path::PathBuf;

use reqwest::header::{HeaderValue, USER_AGENT};
use tracing::info;

use super::ModuleLoader;
use super::cache::{ArtifactCache, ModuleFiles};
use super::node::{DRIVER_SOURCE, NodeModule, NodeRuntime};
use crate::error::{LoadError, Result};
use crate::module::{LoadedCompiler, StripTypesModule};
use crate::package::{ModuleSpec, ResolvedPackages, resolve};
use crate::version::Version;

/// Default CDN root; packages live at `<root>/<package>@<version>/<file>`.
pub const DEFAULT_CDN_URL: &str = "https://cdn.jsdelivr.net/npm";

/// User agent string for download requests.
const USER_AGENT_VALUE: &str = concat!(
    "swc-playground/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/swc-project/swc-playground)"
);

/// Settings for [`CdnLoader`].
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// CDN root URL, without trailing slash.
    pub cdn_url: String,
    /// Directory for downloaded artifacts.
    pub cache_dir: PathBuf,
    /// Node.js executable.
    pub node_path: PathBuf,
}

impl LoaderConfig {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cdn_url: DEFAULT_CDN_URL.to_string(),
            cache_dir: cache_dir.into(),
            node_path: PathBuf::from("node"),
        }
    }
}

/// Downloads, caches and starts compiler modules.
#[derive(Debug, Clone)]
pub struct CdnLoader {
    client: reqwest::Client,
    cdn_url: String,
    cache: ArtifactCache,
    node_path: PathBuf,
}

impl CdnLoader {
    pub fn new(config: LoaderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LoadError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            cdn_url: config.cdn_url.trim_end_matches('/').to_string(),
            cache: ArtifactCache::new(config.cache_dir),
            node_path: config.node_path,
        })
    }

    #[must_use]
    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Full CDN URL of a path such as `@swc/wasm-web@1.7.26/wasm.js`.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.cdn_url, path)
    }

    /// Downloads one file.
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Downloading {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(LoadError::Network(format!(
                "Download of {url} failed with status {status}"
            )));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| LoadError::Network(e.to_string()))?;

        Ok(data.to_vec())
    }

    /// Returns cached files for `spec`, downloading them on a miss.
    pub async fn fetch_module(&self, spec: &ModuleSpec) -> Result<ModuleFiles> {
        if let Some(files) = self.cache.lookup(spec).await {
            return Ok(files);
        }

        let entry_url = self.url_for(&spec.entry_path());
        let wasm_url = self.url_for(&spec.wasm_path());
        let (entry, wasm) = tokio::try_join!(self.download(&entry_url), self.download(&wasm_url))?;

        info!(module = %spec, bytes = entry.len() + wasm.len(), "downloaded");
        self.cache.store(spec, &entry, &wasm).await
    }

    async fn start_module(&self, spec: ModuleSpec, runtime: NodeRuntime) -> Result<NodeModule> {
        let files = self.fetch_module(&spec).await?;
        tokio::task::spawn_blocking(move || NodeModule::start(runtime, spec, files))
            .await
            .map_err(|e| LoadError::Runtime(format!("driver start task failed: {e}")))?
    }
}

impl ModuleLoader for CdnLoader {
    async fn load(&self, version: &Version) -> Result<LoadedCompiler> {
        let ResolvedPackages { core, strip_types } = resolve(version);
        let driver_path = self.cache.install_driver(DRIVER_SOURCE).await?;
        let runtime = NodeRuntime {
            node_path: self.node_path.clone(),
            driver_path,
        };

        let strip_runtime = runtime.clone();
        let core = self.start_module(core, runtime);
        let strip_types = async move {
            match strip_types {
                Some(spec) => self.start_module(spec, strip_runtime).await.map(Some),
                None => Ok(None),
            }
        };
        let (core, strip_types) = tokio::try_join!(core, strip_types)?;

        info!(%version, strip_types = strip_types.is_some(), "swc loaded");
        Ok(LoadedCompiler::new(
            version.clone(),
            Box::new(core),
            strip_types.map(|module| Box::new(module) as Box<dyn StripTypesModule>),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::core_module;
    use tempfile::tempdir;

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT_VALUE.starts_with("swc-playground/"));
    }

    #[test]
    fn test_urls() {
        let mut config = LoaderConfig::new("/tmp/cache");
        config.cdn_url = "https://cdn.example.com/npm/".to_string();
        let loader = CdnLoader::new(config).unwrap();

        let spec = core_module(&Version::new(1, 2, 168));
        assert_eq!(
            loader.url_for(&spec.entry_path()),
            "https://cdn.example.com/npm/@swc/binding_core_wasm@1.2.168/wasm-web.js"
        );
        assert_eq!(
            loader.url_for(&spec.wasm_path()),
            "https://cdn.example.com/npm/@swc/binding_core_wasm@1.2.168/wasm-web_bg.wasm"
        );
    }

    #[tokio::test]
    async fn test_cached_module_skips_download() {
        let dir = tempdir().unwrap();
        let mut config = LoaderConfig::new(dir.path());
        // Unroutable; any download attempt would fail.
        config.cdn_url = "http://127.0.0.1:9".to_string();
        let loader = CdnLoader::new(config).unwrap();

        let spec = core_module(&Version::new(1, 7, 26));
        let stored = loader.cache().store(&spec, b"entry", b"wasm").await.unwrap();

        let files = loader.fetch_module(&spec).await.unwrap();
        assert_eq!(files, stored);
    }
}
