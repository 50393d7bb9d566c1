//! Typed view over the compiler configuration.
//!
//! These types mirror the subset of the `.swcrc` schema that the playground
//! exposes through form controls. Keys that are not modelled here are still
//! kept in the canonical text (see [`ConfigDocument`](crate::ConfigDocument))
//! and forwarded to the compiler untouched.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Root of the compiler configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerConfig {
    /// Parser, target and minifier options.
    #[serde(default)]
    pub jsc: JscConfig,

    /// Module output options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleConfig>,

    /// Whether to minify the output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,

    /// Environment targeting (preset-env style).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<EnvOptions>,

    /// Whether the input is parsed as a module, a script, or detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_module: Option<IsModule>,
}

impl CompilerConfig {
    /// Returns the synthetic file name handed to the compiler.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        self.jsc.parser.file_name()
    }

    /// Returns true when `jsc.minify.compress` is switched on.
    #[must_use]
    pub fn compress_enabled(&self) -> bool {
        self.jsc
            .minify
            .as_ref()
            .and_then(|minify| minify.compress.as_ref())
            .is_some_and(MinifyToggle::is_enabled)
    }

    /// Returns true when `jsc.minify.mangle` is switched on.
    #[must_use]
    pub fn mangle_enabled(&self) -> bool {
        self.jsc
            .minify
            .as_ref()
            .and_then(|minify| minify.mangle.as_ref())
            .is_some_and(MinifyToggle::is_enabled)
    }
}

/// The `jsc` option group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JscConfig {
    /// Parser selection; exactly one syntax is active.
    #[serde(default)]
    pub parser: ParserConfig,

    /// Output language version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<EsVersion>,

    /// Loose mode for transforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loose: Option<bool>,

    /// Minifier sub-options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<MinifyOptions>,
}

/// Source syntax understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// JavaScript, optionally with JSX.
    #[default]
    Ecmascript,
    /// TypeScript, optionally with TSX.
    Typescript,
}

impl Syntax {
    /// Get all syntaxes in display order.
    #[must_use]
    pub const fn all() -> &'static [Syntax] {
        &[Self::Ecmascript, Self::Typescript]
    }

    /// Value used for the `syntax` discriminant.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ecmascript => "ecmascript",
            Self::Typescript => "typescript",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ecmascript => "JavaScript",
            Self::Typescript => "TypeScript",
        }
    }

    /// Name of the flag that enables element (JSX/TSX) syntax.
    #[must_use]
    pub const fn element_flag(&self) -> &'static str {
        match self {
            Self::Ecmascript => "jsx",
            Self::Typescript => "tsx",
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parser options, discriminated by `syntax`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "syntax", rename_all = "lowercase")]
pub enum ParserConfig {
    /// `{ "syntax": "ecmascript", "jsx": ... }`
    Ecmascript(EsParserConfig),
    /// `{ "syntax": "typescript", "tsx": ... }`
    Typescript(TsParserConfig),
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::Ecmascript(EsParserConfig::default())
    }
}

impl ParserConfig {
    /// Active syntax.
    #[must_use]
    pub fn syntax(&self) -> Syntax {
        match self {
            Self::Ecmascript(_) => Syntax::Ecmascript,
            Self::Typescript(_) => Syntax::Typescript,
        }
    }

    /// Whether the source uses element syntax (JSX for ecmascript, TSX for typescript).
    #[must_use]
    pub fn uses_element_syntax(&self) -> bool {
        match self {
            Self::Ecmascript(options) => options.jsx,
            Self::Typescript(options) => options.tsx,
        }
    }

    /// Parser options for `syntax`, carrying over the element-syntax flag.
    #[must_use]
    pub fn with_syntax(&self, syntax: Syntax) -> Self {
        let element_syntax = self.uses_element_syntax();
        match syntax {
            Syntax::Ecmascript => Self::Ecmascript(EsParserConfig {
                jsx: element_syntax,
                ..EsParserConfig::default()
            }),
            Syntax::Typescript => Self::Typescript(TsParserConfig {
                tsx: element_syntax,
                ..TsParserConfig::default()
            }),
        }
    }

    /// Synthetic source file name for these options.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Ecmascript(options) => source_file_name(Syntax::Ecmascript, options.jsx, false),
            Self::Typescript(options) => source_file_name(Syntax::Typescript, false, options.tsx),
        }
    }
}

/// Derives the file name passed to the compiler.
///
/// Only the flag belonging to `syntax` is consulted: `jsx` for ecmascript,
/// `tsx` for typescript.
#[must_use]
pub const fn source_file_name(syntax: Syntax, jsx: bool, tsx: bool) -> &'static str {
    match (syntax, jsx, tsx) {
        (Syntax::Ecmascript, true, _) => "input.jsx",
        (Syntax::Ecmascript, false, _) => "input.js",
        (Syntax::Typescript, _, true) => "input.tsx",
        (Syntax::Typescript, _, false) => "input.ts",
    }
}

/// Ecmascript parser flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsParserConfig {
    /// Enable JSX.
    #[serde(default)]
    pub jsx: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorators: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_bind: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_default_from: Option<bool>,
}

/// Typescript parser flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsParserConfig {
    /// Enable TSX.
    #[serde(default)]
    pub tsx: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorators: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dts: Option<bool>,
}

/// Output language version (`jsc.target`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EsVersion {
    Es3,
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    EsNext,
}

impl EsVersion {
    /// Get all targets in ascending order.
    #[must_use]
    pub const fn all() -> &'static [EsVersion] {
        &[
            Self::Es3,
            Self::Es5,
            Self::Es2015,
            Self::Es2016,
            Self::Es2017,
            Self::Es2018,
            Self::Es2019,
            Self::Es2020,
            Self::Es2021,
            Self::Es2022,
            Self::EsNext,
        ]
    }

    /// Value used in the configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Es3 => "es3",
            Self::Es5 => "es5",
            Self::Es2015 => "es2015",
            Self::Es2016 => "es2016",
            Self::Es2017 => "es2017",
            Self::Es2018 => "es2018",
            Self::Es2019 => "es2019",
            Self::Es2020 => "es2020",
            Self::Es2021 => "es2021",
            Self::Es2022 => "es2022",
            Self::EsNext => "esnext",
        }
    }
}

impl fmt::Display for EsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `module` option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    /// Module output kind.
    #[serde(rename = "type")]
    pub kind: ModuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lazy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_interop: Option<bool>,
}

impl ModuleConfig {
    /// Module options with only the kind set.
    #[must_use]
    pub const fn new(kind: ModuleKind) -> Self {
        Self {
            kind,
            strict: None,
            strict_mode: None,
            lazy: None,
            no_interop: None,
        }
    }
}

/// Module output kind (`module.type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Es6,
    CommonJs,
    Amd,
    Umd,
    SystemJs,
    NodeNext,
}

impl ModuleKind {
    /// Get all module kinds in display order.
    #[must_use]
    pub const fn all() -> &'static [ModuleKind] {
        &[
            Self::Es6,
            Self::CommonJs,
            Self::Amd,
            Self::Umd,
            Self::SystemJs,
            Self::NodeNext,
        ]
    }

    /// Value used in the configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Es6 => "es6",
            Self::CommonJs => "commonjs",
            Self::Amd => "amd",
            Self::Umd => "umd",
            Self::SystemJs => "systemjs",
            Self::NodeNext => "nodenext",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Es6 => "ES Modules",
            Self::CommonJs => "CommonJS",
            Self::Amd => "AMD",
            Self::Umd => "UMD",
            Self::SystemJs => "SystemJS",
            Self::NodeNext => "NodeNext",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `jsc.minify` option group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinifyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress: Option<MinifyToggle<CompressOptions>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mangle: Option<MinifyToggle<MangleOptions>>,
}

/// A minifier group that is either a plain flag or a record of options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinifyToggle<T> {
    /// `false` (off) or `true` (on with compiler defaults).
    Flag(bool),
    /// On, with explicit options.
    Options(T),
}

impl<T> MinifyToggle<T> {
    /// Whether the group is switched on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Flag(enabled) => *enabled,
            Self::Options(_) => true,
        }
    }

    /// Explicit options, if any.
    #[must_use]
    pub fn options(&self) -> Option<&T> {
        match self {
            Self::Flag(_) => None,
            Self::Options(options) => Some(options),
        }
    }
}

/// Optimizer toggles for `jsc.minify.compress`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompressOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrows: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booleans: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booleans_as_integers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_vars: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparisons: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_props: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditionals: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead_code: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directives: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_console: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_debugger: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hoist_funs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hoist_props: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hoist_vars: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_return: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_vars: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_classnames: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_fargs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_fnames: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_infinity: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loops: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate_iife: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce_funcs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce_vars: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switches: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typeofs: Option<bool>,
    #[serde(rename = "unsafe", default, skip_serializing_if = "Option::is_none")]
    pub unsafe_: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsafe_arrows: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsafe_comps: Option<bool>,
    #[serde(rename = "unsafe_Function", default, skip_serializing_if = "Option::is_none")]
    pub unsafe_function: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsafe_math: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsafe_symbols: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsafe_methods: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsafe_proto: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsafe_regexp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsafe_undefined: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unused: Option<bool>,
    /// Number of optimizer passes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub const_to_let: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pristine_globals: Option<bool>,
}

/// Name-shortening toggles for `jsc.minify.mangle`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MangleOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toplevel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_classnames: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_fnames: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_private_props: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ie8: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safari10: Option<bool>,
}

/// `env` option group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<EnvTargets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bugfixes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped_proposals: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_all_transforms: Option<bool>,
}

/// Browser targets: a browserslist query, a list of queries, or per-engine versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvTargets {
    Query(String),
    Queries(Vec<String>),
    Engines(BTreeMap<String, String>),
}

/// Source type of the input: `true`, `false` or `"unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IsModule {
    /// `true`
    #[default]
    Module,
    /// `false`
    Script,
    /// `"unknown"`: let the compiler detect it.
    Unknown,
}

impl IsModule {
    /// The boolean form, if this is not `"unknown"`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Module => Some(true),
            Self::Script => Some(false),
            Self::Unknown => None,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Module => "Module",
            Self::Script => "Script",
            Self::Unknown => "Unknown",
        }
    }
}

const UNKNOWN_SOURCE_TYPE: &str = "unknown";

impl Serialize for IsModule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.as_bool() {
            Some(flag) => serializer.serialize_bool(flag),
            None => serializer.serialize_str(UNKNOWN_SOURCE_TYPE),
        }
    }
}

impl<'de> Deserialize<'de> for IsModule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(Self::Module),
            Raw::Flag(false) => Ok(Self::Script),
            Raw::Text(text) if text == UNKNOWN_SOURCE_TYPE => Ok(Self::Unknown),
            Raw::Text(text) => Err(de::Error::invalid_value(
                de::Unexpected::Str(&text),
                &"true, false or \"unknown\"",
            )),
        }
    }
}
