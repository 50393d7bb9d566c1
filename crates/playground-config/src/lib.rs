//! Compiler configuration for the SWC playground.
//!
//! The playground keeps the compiler configuration as JSON-with-comments
//! text (the same shape as an `.swcrc` file) so that free-form edits made in
//! the configuration editor survive untouched. Everything else is derived
//! from that text on demand:
//!
//! - [`CompilerConfig`] - a typed, read-only view used by form controls
//! - [`ConfigDocument`] - the canonical text plus structured edits
//! - [`defaults`] - records installed when an option group is switched on
//! - [`config_schema`] - JSON schema used for editor validation/completion
//!
//! # Example
//!
//! ```
//! use playground_config::{ConfigDocument, Syntax};
//!
//! let mut document = ConfigDocument::default();
//! document.set_syntax(Syntax::Typescript).unwrap();
//! document.set_compress(true).unwrap();
//!
//! let config = document.typed().unwrap();
//! assert_eq!(config.jsc.parser.file_name(), "input.ts");
//! ```

mod config;
pub mod defaults;
mod document;
mod error;
mod schema;

pub use config::{
    CompilerConfig, CompressOptions, EnvOptions, EnvTargets, EsParserConfig, EsVersion, IsModule,
    JscConfig, MangleOptions, MinifyOptions, MinifyToggle, ModuleConfig, ModuleKind,
    ParserConfig, Syntax, TsParserConfig, source_file_name,
};
pub use defaults::{
    default_compress_options, default_config, default_env_options, default_mangle_options,
};
pub use document::{ConfigDocument, format_json, parse_jsonc};
pub use error::{ConfigError, Result};
pub use schema::config_schema;
