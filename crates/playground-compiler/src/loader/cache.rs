//! Version-keyed on-disk cache of downloaded compiler artifacts.
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   driver.mjs
//!   @swc/wasm-web@1.7.26/
//!     manifest.json
//!     wasm.js
//!     wasm_bg.wasm
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::checksum::{compute_sha256, verify_sha256};
use crate::error::{LoadError, Result};
use crate::package::ModuleSpec;
use crate::version::Version;

const MANIFEST_FILE: &str = "manifest.json";
const DRIVER_FILE: &str = "driver.mjs";

/// Record of what was downloaded for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    pub package: String,
    pub version: Version,
    pub fetched_at: DateTime<Utc>,
    /// File name to SHA256 digest.
    pub files: BTreeMap<String, String>,
}

/// Paths of a cached module's entry file and wasm binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFiles {
    pub entry: PathBuf,
    pub wasm: PathBuf,
}

/// On-disk artifact cache.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    root: PathBuf,
}

impl ArtifactCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the files of `spec`.
    #[must_use]
    pub fn module_dir(&self, spec: &ModuleSpec) -> PathBuf {
        let key = format!("{}@{}", spec.package, spec.version);
        key.split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    fn files_for(&self, spec: &ModuleSpec) -> ModuleFiles {
        let dir = self.module_dir(spec);
        ModuleFiles {
            entry: dir.join(spec.entry),
            wasm: dir.join(spec.wasm_file()),
        }
    }

    /// Reads the manifest of `spec`, if one was written.
    pub async fn manifest(&self, spec: &ModuleSpec) -> Result<Option<CacheManifest>> {
        let path = self.module_dir(spec).join(MANIFEST_FILE);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Checks the cached files of `spec` against their recorded digests.
    pub async fn verify(&self, spec: &ModuleSpec, manifest: &CacheManifest) -> Result<ModuleFiles> {
        let files = self.files_for(spec);
        for path in [&files.entry, &files.wasm] {
            let name = file_name(path);
            let expected = manifest
                .files
                .get(&name)
                .ok_or_else(|| LoadError::Io(format!("{name} missing from cache manifest")))?;
            let data = fs::read(path).await?;
            verify_sha256(&name, &data, expected)?;
        }
        Ok(files)
    }

    /// Returns the cached files of `spec` when present and intact.
    ///
    /// A corrupted or unreadable entry counts as a miss.
    pub async fn lookup(&self, spec: &ModuleSpec) -> Option<ModuleFiles> {
        let manifest = match self.manifest(spec).await {
            Ok(Some(manifest)) => manifest,
            Ok(None) => return None,
            Err(err) => {
                warn!(module = %spec, "unreadable cache manifest: {err}");
                return None;
            }
        };
        match self.verify(spec, &manifest).await {
            Ok(files) => {
                debug!(module = %spec, "cache hit");
                Some(files)
            }
            Err(err) => {
                warn!(module = %spec, "discarding cached module: {err}");
                None
            }
        }
    }

    /// Writes the downloaded files of `spec` and records their digests.
    pub async fn store(&self, spec: &ModuleSpec, entry: &[u8], wasm: &[u8]) -> Result<ModuleFiles> {
        let files = self.files_for(spec);
        write_atomic(&files.entry, entry).await?;
        write_atomic(&files.wasm, wasm).await?;
        // wasm-bindgen web entries are ES modules
        write_atomic(
            &self.module_dir(spec).join("package.json"),
            br#"{ "type": "module" }"#,
        )
        .await?;

        let manifest = CacheManifest {
            package: spec.package.to_string(),
            version: spec.version.clone(),
            fetched_at: Utc::now(),
            files: BTreeMap::from([
                (spec.entry.to_string(), compute_sha256(entry)),
                (spec.wasm_file(), compute_sha256(wasm)),
            ]),
        };
        let bytes = serde_json::to_vec_pretty(&manifest)?;
        write_atomic(&self.module_dir(spec).join(MANIFEST_FILE), &bytes).await?;

        Ok(files)
    }

    /// Writes the runtime driver script if it is missing or outdated.
    pub async fn install_driver(&self, source: &str) -> Result<PathBuf> {
        let path = self.root.join(DRIVER_FILE);
        let current = fs::read(&path).await.ok();
        if current.as_deref() != Some(source.as_bytes()) {
            write_atomic(&path, source.as_bytes()).await?;
        }
        Ok(path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Writes to a temp file first, then renames it into place.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&temp_path, path).await?;
    debug!("wrote {}", path.display());
    Ok(())
}
