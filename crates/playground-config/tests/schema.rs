//! Tests for validating configuration documents against the editor schema.

#![allow(missing_docs)]

use playground_config::{ConfigDocument, EsVersion, Syntax, config_schema, default_config};
use serde_json::json;

fn validator() -> jsonschema::Validator {
    jsonschema::validator_for(&config_schema()).expect("schema compiles")
}

#[test]
fn test_default_config_is_valid() {
    assert!(validator().is_valid(&default_config()));
}

#[test]
fn test_edited_configs_are_valid() {
    let validator = validator();

    let mut document = ConfigDocument::default();
    document.set_syntax(Syntax::Typescript).unwrap();
    document.set_jsx_or_tsx(true).unwrap();
    document.set_target(EsVersion::EsNext).unwrap();
    document.set_compress(true).unwrap();
    document.set_mangle(true).unwrap();
    document.set_env(true).unwrap();
    document.set_bugfixes(true).unwrap();

    assert!(validator.is_valid(&document.parse().unwrap()));
}

#[test]
fn test_sample_configs() {
    let validator = validator();

    let samples = [
        json!({ "jsc": { "parser": { "syntax": "ecmascript", "jsx": true } } }),
        json!({ "jsc": { "minify": { "compress": { "passes": 2, "unsafe": true } } } }),
        json!({ "env": { "targets": { "chrome": "79" }, "mode": "usage" } }),
        json!({ "env": { "targets": ["> 1%", "not dead"] } }),
        json!({ "isModule": "unknown", "module": { "type": "commonjs" } }),
    ];
    for sample in &samples {
        assert!(validator.is_valid(sample), "rejected {sample}");
    }
}

#[test]
fn test_invalid_configs_are_rejected() {
    let validator = validator();

    let samples = [
        json!({ "jsc": { "target": "es1999" } }),
        json!({ "jsc": { "parser": { "syntax": "coffeescript" } } }),
        json!({ "module": { "type": "iife" } }),
        json!({ "isModule": "maybe" }),
        json!({ "jsc": { "minify": { "mangle": "yes" } } }),
    ];
    for sample in &samples {
        assert!(!validator.is_valid(sample), "accepted {sample}");
    }
}
