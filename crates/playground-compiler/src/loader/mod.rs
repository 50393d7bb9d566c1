//! Loading compiler modules for a version.
//!
//! [`ModuleLoader`] is the seam between the facade and the outside world.
//! The shipped [`CdnLoader`] downloads the wasm packages into an on-disk
//! cache and hosts them in Node.js driver processes.

mod cache;
mod cdn;
mod node;

use std::future::Future;

pub use cache::{ArtifactCache, CacheManifest, ModuleFiles};
pub use cdn::{CdnLoader, DEFAULT_CDN_URL, LoaderConfig};
pub use node::{DRIVER_SOURCE, NodeModule, NodeRuntime};

use crate::error::Result;
use crate::module::LoadedCompiler;
use crate::version::Version;

/// Resolves a compiler version to initialized modules.
pub trait ModuleLoader: Send + Sync {
    /// Loads the core module and, when the version has one, the
    /// type-stripping module.
    fn load(&self, version: &Version) -> impl Future<Output = Result<LoadedCompiler>> + Send;
}
