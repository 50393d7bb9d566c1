//! JSON schema for the configuration editor.
//!
//! The schema only drives editor completion and validation; compile calls
//! never consult it.

use serde_json::{Map, Value, json};

use crate::config::{EsVersion, ModuleKind};
use crate::defaults::{COMPRESS_DEFAULTS, MANGLE_KEYS};

const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Builds the configuration schema.
#[must_use]
pub fn config_schema() -> Value {
    let targets: Vec<&str> = EsVersion::all().iter().map(EsVersion::as_str).collect();
    let module_kinds: Vec<&str> = ModuleKind::all().iter().map(ModuleKind::as_str).collect();

    json!({
        "$schema": SCHEMA_DIALECT,
        "title": "SWC configuration",
        "type": "object",
        "properties": {
            "jsc": {
                "type": "object",
                "properties": {
                    "parser": parser_schema(),
                    "target": { "type": "string", "enum": targets },
                    "loose": { "type": "boolean" },
                    "minify": {
                        "type": "object",
                        "properties": {
                            "compress": toggle_schema(compress_schema()),
                            "mangle": toggle_schema(mangle_schema())
                        }
                    }
                }
            },
            "module": {
                "type": "object",
                "properties": {
                    "type": { "type": "string", "enum": module_kinds },
                    "strict": { "type": "boolean" },
                    "strictMode": { "type": "boolean" },
                    "lazy": { "type": "boolean" },
                    "noInterop": { "type": "boolean" }
                },
                "required": ["type"]
            },
            "minify": { "type": "boolean" },
            "env": env_schema(),
            "isModule": {
                "oneOf": [
                    { "type": "boolean" },
                    { "const": "unknown" }
                ]
            }
        }
    })
}

fn parser_schema() -> Value {
    json!({
        "oneOf": [
            {
                "type": "object",
                "properties": {
                    "syntax": { "const": "ecmascript" },
                    "jsx": { "type": "boolean" },
                    "decorators": { "type": "boolean" },
                    "functionBind": { "type": "boolean" },
                    "exportDefaultFrom": { "type": "boolean" }
                },
                "required": ["syntax"]
            },
            {
                "type": "object",
                "properties": {
                    "syntax": { "const": "typescript" },
                    "tsx": { "type": "boolean" },
                    "decorators": { "type": "boolean" },
                    "dts": { "type": "boolean" }
                },
                "required": ["syntax"]
            }
        ]
    })
}

fn toggle_schema(options: Value) -> Value {
    json!({ "oneOf": [{ "type": "boolean" }, options] })
}

fn compress_schema() -> Value {
    let mut properties: Map<String, Value> = COMPRESS_DEFAULTS
        .iter()
        .map(|(key, _)| ((*key).to_string(), json!({ "type": "boolean" })))
        .collect();
    properties.insert(
        "passes".to_string(),
        json!({ "type": "integer", "minimum": 0 }),
    );
    properties.insert("const_to_let".to_string(), json!({ "type": "boolean" }));
    properties.insert("pristine_globals".to_string(), json!({ "type": "boolean" }));

    json!({ "type": "object", "properties": properties })
}

fn mangle_schema() -> Value {
    let properties: Map<String, Value> = MANGLE_KEYS
        .iter()
        .map(|key| ((*key).to_string(), json!({ "type": "boolean" })))
        .collect();
    json!({ "type": "object", "properties": properties })
}

fn env_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "targets": {
                "oneOf": [
                    { "type": "string" },
                    { "type": "array", "items": { "type": "string" } },
                    { "type": "object", "additionalProperties": { "type": "string" } }
                ]
            },
            "mode": { "type": "string", "enum": ["usage", "entry"] },
            "bugfixes": { "type": "boolean" },
            "loose": { "type": "boolean" },
            "shippedProposals": { "type": "boolean" },
            "forceAllTransforms": { "type": "boolean" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_enumerations() {
        let schema = config_schema();
        let targets = &schema["properties"]["jsc"]["properties"]["target"]["enum"];
        assert_eq!(targets[0], json!("es3"));
        assert_eq!(targets.as_array().unwrap().len(), EsVersion::all().len());

        let kinds = &schema["properties"]["module"]["properties"]["type"]["enum"];
        assert!(kinds.as_array().unwrap().contains(&json!("nodenext")));
    }

    #[test]
    fn test_compress_properties_follow_defaults() {
        let schema = config_schema();
        let compress =
            &schema["properties"]["jsc"]["properties"]["minify"]["properties"]["compress"];
        let properties = compress["oneOf"][1]["properties"].as_object().unwrap();
        for (key, _) in COMPRESS_DEFAULTS {
            assert!(properties.contains_key(*key), "missing {key}");
        }
    }
}
