//! Built-in option records.
//!
//! These are installed verbatim when an option group is switched on from an
//! off state, and form the starting configuration of a fresh session.

use serde_json::{Map, Value, json};

/// Compress toggles in the order they are written out, with their default values.
pub const COMPRESS_DEFAULTS: &[(&str, bool)] = &[
    ("arguments", false),
    ("arrows", true),
    ("booleans", true),
    ("booleans_as_integers", false),
    ("collapse_vars", true),
    ("comparisons", true),
    ("computed_props", false),
    ("conditionals", false),
    ("dead_code", false),
    ("directives", false),
    ("drop_console", false),
    ("drop_debugger", true),
    ("evaluate", true),
    ("expression", false),
    ("hoist_funs", false),
    ("hoist_props", true),
    ("hoist_vars", false),
    ("if_return", true),
    ("join_vars", true),
    ("keep_classnames", false),
    ("keep_fargs", true),
    ("keep_fnames", false),
    ("keep_infinity", false),
    ("loops", true),
    ("negate_iife", true),
    ("properties", true),
    ("reduce_funcs", false),
    ("reduce_vars", false),
    ("side_effects", true),
    ("switches", false),
    ("typeofs", true),
    ("unsafe", false),
    ("unsafe_arrows", false),
    ("unsafe_comps", false),
    ("unsafe_Function", false),
    ("unsafe_math", false),
    ("unsafe_symbols", false),
    ("unsafe_methods", false),
    ("unsafe_proto", false),
    ("unsafe_regexp", false),
    ("unsafe_undefined", false),
    ("unused", true),
];

/// Mangle toggles in the order they are written out. All default to `false`.
pub const MANGLE_KEYS: &[&str] = &[
    "toplevel",
    "keep_classnames",
    "keep_fnames",
    "keep_private_props",
    "ie8",
    "safari10",
];

/// The record installed when `jsc.minify.compress` is switched on.
#[must_use]
pub fn default_compress_options() -> Value {
    let record: Map<String, Value> = COMPRESS_DEFAULTS
        .iter()
        .map(|(key, value)| ((*key).to_string(), Value::Bool(*value)))
        .collect();
    Value::Object(record)
}

/// The record installed when `jsc.minify.mangle` is switched on.
#[must_use]
pub fn default_mangle_options() -> Value {
    let record: Map<String, Value> = MANGLE_KEYS
        .iter()
        .map(|key| ((*key).to_string(), Value::Bool(false)))
        .collect();
    Value::Object(record)
}

/// The record installed when `env` is switched on.
#[must_use]
pub fn default_env_options() -> Value {
    json!({ "targets": "" })
}

/// Configuration of a fresh session.
#[must_use]
pub fn default_config() -> Value {
    json!({
        "jsc": {
            "parser": {
                "syntax": "ecmascript",
                "jsx": false
            },
            "target": "es5",
            "loose": false,
            "minify": {
                "compress": false,
                "mangle": false
            }
        },
        "module": {
            "type": "es6"
        },
        "minify": false,
        "isModule": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompilerConfig, CompressOptions, EsVersion, IsModule, MangleOptions, ModuleKind};

    #[test]
    fn test_compress_record() {
        let record = default_compress_options();
        let object = record.as_object().unwrap();
        assert_eq!(object.len(), 42);
        assert_eq!(object["arrows"], json!(true));
        assert_eq!(object["drop_debugger"], json!(true));
        assert_eq!(object["unused"], json!(true));
        assert_eq!(object["unsafe_Function"], json!(false));

        let unsafe_enabled = object
            .iter()
            .filter(|(key, _)| key.starts_with("unsafe"))
            .any(|(_, value)| value == &json!(true));
        assert!(!unsafe_enabled);
    }

    #[test]
    fn test_compress_record_matches_typed_fields() {
        let typed: CompressOptions = serde_json::from_value(default_compress_options()).unwrap();
        assert_eq!(typed.arrows, Some(true));
        assert_eq!(typed.unsafe_, Some(false));
        assert_eq!(typed.unsafe_function, Some(false));

        // Every key maps onto a typed field, so nothing is lost on re-serialization.
        assert_eq!(serde_json::to_value(typed).unwrap(), default_compress_options());
    }

    #[test]
    fn test_mangle_record() {
        insta::assert_json_snapshot!(default_mangle_options(), @r#"
        {
          "toplevel": false,
          "keep_classnames": false,
          "keep_fnames": false,
          "keep_private_props": false,
          "ie8": false,
          "safari10": false
        }
        "#);

        let typed: MangleOptions = serde_json::from_value(default_mangle_options()).unwrap();
        assert_eq!(typed.safari10, Some(false));
    }

    #[test]
    fn test_env_record() {
        assert_eq!(default_env_options(), json!({ "targets": "" }));
    }

    #[test]
    fn test_default_config() {
        let config: CompilerConfig = serde_json::from_value(default_config()).unwrap();
        assert_eq!(config.file_name(), "input.js");
        assert_eq!(config.jsc.target, Some(EsVersion::Es5));
        assert_eq!(config.jsc.loose, Some(false));
        assert!(!config.compress_enabled());
        assert!(!config.mangle_enabled());
        assert_eq!(config.module.map(|module| module.kind), Some(ModuleKind::Es6));
        assert_eq!(config.minify, Some(false));
        assert_eq!(config.is_module, Some(IsModule::Module));
    }

    #[test]
    fn test_defaults_are_stable() {
        assert_eq!(default_config(), default_config());
        assert_eq!(default_compress_options(), default_compress_options());
    }
}
