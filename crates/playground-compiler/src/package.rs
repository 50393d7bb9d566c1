//! Mapping from a compiler version to the npm artifacts that provide it.
//!
//! The wasm build of swc was published under different package names and
//! entry files over time:
//!
//! | Version range               | Package                  | Entry         |
//! |-----------------------------|--------------------------|---------------|
//! | `<= 1.2.165`                | `@swc/wasm-web`          | `wasm.js`     |
//! | `1.2.166 ..= 1.2.170`       | `@swc/binding_core_wasm` | `wasm-web.js` |
//! | `1.2.171 .. 1.6.7`          | `@swc/wasm-web`          | `wasm-web.js` |
//! | `>= 1.6.7`                  | `@swc/wasm-web`          | `wasm.js`     |
//!
//! From 1.7.1 on, a separate `@swc/wasm-typescript-esm` module provides
//! type stripping.

use std::fmt;

use crate::version::Version;

/// Package that carries the wasm compiler for most versions.
pub const WASM_WEB_PACKAGE: &str = "@swc/wasm-web";
/// Package name used between 1.2.166 and 1.2.170.
pub const BINDING_CORE_WASM_PACKAGE: &str = "@swc/binding_core_wasm";
/// Type-stripping module package.
pub const STRIP_TYPES_PACKAGE: &str = "@swc/wasm-typescript-esm";

const LEGACY_ENTRY: &str = "wasm-web.js";
const ENTRY: &str = "wasm.js";

/// Last version published under [`WASM_WEB_PACKAGE`] before the rename.
const RENAMED_AFTER: Version = Version::new(1, 2, 165);
/// Last version published under [`BINDING_CORE_WASM_PACKAGE`].
const RENAMED_UNTIL: Version = Version::new(1, 2, 170);
/// First version whose entry file is `wasm.js` again.
const ENTRY_RESTORED: Version = Version::new(1, 6, 7);
/// First version with a type-stripping module.
pub const STRIP_TYPES_SINCE: Version = Version::new(1, 7, 1);

/// One loadable JavaScript module: package, version and entry file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleSpec {
    /// npm package name.
    pub package: &'static str,
    /// Published version.
    pub version: Version,
    /// Entry file inside the package.
    pub entry: &'static str,
}

impl ModuleSpec {
    /// Path of the entry file relative to a CDN root, e.g. `@swc/wasm-web@1.7.26/wasm.js`.
    #[must_use]
    pub fn entry_path(&self) -> String {
        format!("{}@{}/{}", self.package, self.version, self.entry)
    }

    /// Path of the wasm binary relative to a CDN root.
    #[must_use]
    pub fn wasm_path(&self) -> String {
        format!("{}@{}/{}", self.package, self.version, self.wasm_file())
    }

    /// File name of the wasm binary that sits next to the entry file.
    #[must_use]
    pub fn wasm_file(&self) -> String {
        let stem = self.entry.strip_suffix(".js").unwrap_or(self.entry);
        format!("{stem}_bg.wasm")
    }

    /// Whether this is the type-stripping module.
    #[must_use]
    pub fn is_strip_types(&self) -> bool {
        self.package == STRIP_TYPES_PACKAGE
    }
}

impl fmt::Display for ModuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entry_path())
    }
}

/// Package that publishes the core compiler at `version`.
#[must_use]
pub fn package_name(version: &Version) -> &'static str {
    if *version > RENAMED_AFTER && *version <= RENAMED_UNTIL {
        BINDING_CORE_WASM_PACKAGE
    } else {
        WASM_WEB_PACKAGE
    }
}

/// Entry file of the core compiler at `version`.
#[must_use]
pub fn entry_file(version: &Version) -> &'static str {
    if *version > RENAMED_AFTER && *version < ENTRY_RESTORED {
        LEGACY_ENTRY
    } else {
        ENTRY
    }
}

/// Whether a type-stripping module exists for `version`.
#[must_use]
pub fn supports_strip_types(version: &Version) -> bool {
    *version >= STRIP_TYPES_SINCE
}

/// The core compiler module for `version`.
#[must_use]
pub fn core_module(version: &Version) -> ModuleSpec {
    ModuleSpec {
        package: package_name(version),
        version: version.clone(),
        entry: entry_file(version),
    }
}

/// The type-stripping module for `version`, if one exists.
#[must_use]
pub fn strip_types_module(version: &Version) -> Option<ModuleSpec> {
    supports_strip_types(version).then(|| ModuleSpec {
        package: STRIP_TYPES_PACKAGE,
        version: version.clone(),
        entry: ENTRY,
    })
}

/// Everything that has to be loaded for one compiler version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackages {
    pub core: ModuleSpec,
    pub strip_types: Option<ModuleSpec>,
}

/// Resolves all modules for `version`.
#[must_use]
pub fn resolve(version: &Version) -> ResolvedPackages {
    ResolvedPackages {
        core: core_module(version),
        strip_types: strip_types_module(version),
    }
}
