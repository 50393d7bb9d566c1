//! Compiler facade for the SWC playground.
//!
//! Turns a selected swc version into callable modules and normalizes what
//! those modules return:
//!
//! - [`package`] - which npm package and entry file provide a version
//! - [`loader`] - downloading, caching and hosting the wasm modules
//! - [`CompilerFacade`] - load state machine and gated compile calls
//! - [`LoadedCompiler`] - `parse`, `transform` and `strip_types` calls
//! - [`normalize_thrown`] - turning thrown values into display text
//! - [`ParsedAst::rebase`] - shifting AST spans to start at zero
//! - [`diagnostic`] - error locations for editor markers
//! - [`registry`] - published versions of the compiler packages

mod ast;
mod checksum;
pub mod diagnostic;
mod error;
mod facade;
pub mod loader;
mod module;
mod output;
pub mod package;
pub mod registry;
mod thrown;
mod version;

pub use ast::{ParsedAst, Span, rebase_spans};
pub use checksum::{compute_sha256, verify_sha256};
pub use diagnostic::{Diagnostic, EditorMarker, extract_diagnostics, strip_ansi};
pub use error::{LoadError, Result};
pub use facade::{CompilerFacade, LoadOutcome, LoadState, LoadTicket};
pub use loader::{CdnLoader, LoaderConfig, ModuleLoader};
pub use module::{
    CompilerModule, LoadedCompiler, ModuleCall, StripTypesModule, UNKNOWN_SOURCE_TYPE_SINCE,
    parse_options, strip_types_options, transform_options,
};
pub use output::{CompilerOutput, CompilerResult, StripTypesOutput, TransformOutput};
pub use package::{STRIP_TYPES_SINCE, supports_strip_types};
pub use registry::{RegistryClient, VersionIndex};
pub use thrown::{CompileError, LOADING_MESSAGE, Thrown, UNKNOWN_ERROR, normalize_thrown};
pub use version::{Identifier, Version};
