//! Loaded compiler modules and the synchronous compile calls.

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::ast::ParsedAst;
use crate::output::{CompilerResult, StripTypesOutput, TransformOutput};
use crate::thrown::{CompileError, Thrown};
use crate::version::Version;

/// Outcome of one module call: the returned value or what was thrown.
pub type ModuleCall = std::result::Result<Value, Thrown>;

/// The core compiler module (`parseSync` / `transformSync`).
///
/// Implementations are initialized before they are handed out; calls are
/// synchronous and never mutate shared state visible to the caller.
pub trait CompilerModule: Send + Sync {
    fn parse_sync(&self, code: &str, options: &Value) -> ModuleCall;
    fn transform_sync(&self, code: &str, options: &Value) -> ModuleCall;
}

/// The type-stripping module (`transformSync` only).
pub trait StripTypesModule: Send + Sync {
    fn transform_sync(&self, code: &str, options: &Value) -> ModuleCall;
}

/// First version whose parser accepts `isModule: "unknown"`.
pub const UNKNOWN_SOURCE_TYPE_SINCE: Version = Version::new(1, 3, 100);

const UNKNOWN_SOURCE_TYPE: &str = "unknown";

/// The modules of one compiler version, ready to be called.
pub struct LoadedCompiler {
    version: Version,
    core: Box<dyn CompilerModule>,
    strip_types: Option<Box<dyn StripTypesModule>>,
}

impl fmt::Debug for LoadedCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedCompiler")
            .field("version", &self.version)
            .field("strip_types", &self.strip_types.is_some())
            .finish_non_exhaustive()
    }
}

impl LoadedCompiler {
    pub fn new(
        version: Version,
        core: Box<dyn CompilerModule>,
        strip_types: Option<Box<dyn StripTypesModule>>,
    ) -> Self {
        Self {
            version,
            core,
            strip_types,
        }
    }

    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Whether this version ships a type-stripping module.
    #[must_use]
    pub fn has_strip_types(&self) -> bool {
        self.strip_types.is_some()
    }

    /// Parses `code` and returns the raw tree.
    pub fn parse(&self, code: &str, config: &Value) -> CompilerResult<ParsedAst> {
        let options = parse_options(config, &self.version);
        let tree = self.core.parse_sync(code, &options)?;
        Ok(ParsedAst::new(tree))
    }

    /// Transforms `code` with the full configuration.
    pub fn transform(
        &self,
        code: &str,
        file_name: &str,
        config: &Value,
    ) -> CompilerResult<TransformOutput> {
        let options = transform_options(config, file_name, &self.version);
        let value = self.core.transform_sync(code, &options)?;
        serde_json::from_value(value)
            .map_err(|err| CompileError::new(format!("unexpected transform output: {err}")))
    }

    /// Removes type annotations from `code`.
    pub fn strip_types(
        &self,
        code: &str,
        file_name: &str,
        config: &Value,
    ) -> CompilerResult<StripTypesOutput> {
        let Some(module) = &self.strip_types else {
            return Err(CompileError::new(format!(
                "Stripping types is not supported by swc {}",
                self.version
            )));
        };
        let options = strip_types_options(config, file_name);
        let value = module.transform_sync(code, &options)?;
        serde_json::from_value(value)
            .map_err(|err| CompileError::new(format!("unexpected strip-types output: {err}")))
    }
}

/// Options for `parseSync`: the parser options plus `target` and `isModule`.
///
/// `isModule` defaults to `"unknown"`.
#[must_use]
pub fn parse_options(config: &Value, version: &Version) -> Value {
    let mut options = config
        .pointer("/jsc/parser")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    if let Some(target) = config.pointer("/jsc/target") {
        options.insert("target".to_string(), target.clone());
    }

    let is_module = match config.get("isModule") {
        None | Some(Value::Null) => Value::from(UNKNOWN_SOURCE_TYPE),
        Some(value) => value.clone(),
    };
    options.insert("isModule".to_string(), source_type_for(is_module, version));

    Value::Object(options)
}

/// Options for `transformSync`: the whole configuration plus `filename`.
#[must_use]
pub fn transform_options(config: &Value, file_name: &str, version: &Version) -> Value {
    let mut options = config.as_object().cloned().unwrap_or_default();
    if let Some(is_module) = options.get_mut("isModule") {
        *is_module = source_type_for(is_module.take(), version);
    }
    options.insert("filename".to_string(), Value::from(file_name));
    Value::Object(options)
}

/// Options for the type-stripping `transformSync`.
///
/// `module` is only passed when `isModule` is a boolean.
#[must_use]
pub fn strip_types_options(config: &Value, file_name: &str) -> Value {
    let mut options = Map::new();
    options.insert("filename".to_string(), Value::from(file_name));
    if let Some(is_module) = config.get("isModule").and_then(Value::as_bool) {
        options.insert("module".to_string(), Value::Bool(is_module));
    }
    Value::Object(options)
}

/// Older parsers reject `"unknown"`; they get `true` instead.
fn source_type_for(is_module: Value, version: &Version) -> Value {
    if is_module.as_str() == Some(UNKNOWN_SOURCE_TYPE) && *version < UNKNOWN_SOURCE_TYPE_SINCE {
        debug!(%version, "isModule \"unknown\" not supported, using true");
        return Value::Bool(true);
    }
    is_module
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_options_spread_parser() {
        let config = json!({
            "jsc": { "parser": { "syntax": "typescript", "tsx": true }, "target": "es2020" },
            "isModule": false
        });
        assert_eq!(
            parse_options(&config, &v("1.7.26")),
            json!({ "syntax": "typescript", "tsx": true, "target": "es2020", "isModule": false })
        );
    }

    #[test]
    fn test_parse_options_default_source_type() {
        let config = json!({ "jsc": { "parser": { "syntax": "ecmascript" } } });
        let options = parse_options(&config, &v("1.7.26"));
        assert_eq!(options["isModule"], json!("unknown"));
        assert!(options.get("target").is_none());
    }

    #[test]
    fn test_unknown_source_type_on_old_versions() {
        let config = json!({ "isModule": "unknown" });
        assert_eq!(parse_options(&config, &v("1.3.99"))["isModule"], json!(true));
        assert_eq!(parse_options(&config, &v("1.3.100"))["isModule"], json!("unknown"));
        assert_eq!(
            transform_options(&config, "input.js", &v("1.2.0"))["isModule"],
            json!(true)
        );
    }

    #[test]
    fn test_transform_options_add_filename() {
        let config = json!({ "jsc": { "target": "es5" }, "minify": false });
        assert_eq!(
            transform_options(&config, "input.tsx", &v("1.7.26")),
            json!({ "jsc": { "target": "es5" }, "minify": false, "filename": "input.tsx" })
        );
    }

    #[test]
    fn test_strip_types_options() {
        assert_eq!(
            strip_types_options(&json!({ "isModule": true }), "input.ts"),
            json!({ "filename": "input.ts", "module": true })
        );
        assert_eq!(
            strip_types_options(&json!({ "isModule": "unknown" }), "input.ts"),
            json!({ "filename": "input.ts" })
        );
    }
}
