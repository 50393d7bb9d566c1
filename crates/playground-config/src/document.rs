//! Canonical configuration text and structured edits.

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{
    CompilerConfig, CompressOptions, EnvTargets, EsVersion, IsModule, MangleOptions, ModuleKind,
    Syntax,
};
use crate::defaults::{
    default_compress_options, default_config, default_env_options, default_mangle_options,
};
use crate::error::{ConfigError, Result};

/// Parses JSON-with-comments text. Comments and trailing commas are tolerated.
///
/// Plain JSON always parses, including integers beyond `i64` and raw line
/// or paragraph separators inside strings. Only text that is not plain JSON
/// goes through the JSON5 reader.
pub fn parse_jsonc(text: &str) -> Result<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(strict) => json5::from_str(text).map_err(|err| {
            debug!(%strict, "configuration is not plain JSON");
            ConfigError::from(err)
        }),
    }
}

/// Pretty-prints a JSON value with two-space indentation.
#[must_use]
pub fn format_json(value: &Value) -> String {
    // Serializing a `Value` cannot fail: keys are always strings.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Configuration text as the user sees it.
///
/// Free-form text is kept verbatim so that comments survive. Structured edits
/// operate on the parsed tree and re-format the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    text: String,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::from_value(&default_config())
    }
}

impl ConfigDocument {
    /// Wraps text without validating it.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Document holding the pretty form of `value`.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            text: format_json(value),
        }
    }

    /// The canonical text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Replaces the text after checking that it parses.
    ///
    /// On error the document is left unchanged.
    pub fn replace_text(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        parse_jsonc(&text)?;
        self.text = text;
        Ok(())
    }

    /// Parses the text into a JSON tree.
    pub fn parse(&self) -> Result<Value> {
        parse_jsonc(&self.text)
    }

    /// Parses the text into the typed view.
    pub fn typed(&self) -> Result<CompilerConfig> {
        let value = self.parse()?;
        Ok(serde_json::from_value(value)?)
    }

    /// Pretty form of the text. Comments are dropped.
    pub fn formatted(&self) -> Result<String> {
        Ok(format_json(&self.parse()?))
    }

    /// Replaces the text with its pretty form.
    pub fn format(&mut self) -> Result<()> {
        self.text = self.formatted()?;
        Ok(())
    }

    /// Returns the value at a dotted path, if present.
    pub fn get_path(&self, path: &str) -> Result<Option<Value>> {
        let value = self.parse()?;
        let found = path
            .split('.')
            .try_fold(&value, |current, key| current.get(key));
        Ok(found.cloned())
    }

    /// Sets the value at a dotted path, creating intermediate objects.
    pub fn set_path(&mut self, path: &str, value: Value) -> Result<()> {
        let (parents, key) = split_path(path);
        self.edit(|root| {
            let parent = object_at(root, &parents)?;
            parent.insert(key.to_string(), value);
            Ok(())
        })
    }

    /// Removes the value at a dotted path, returning it.
    pub fn remove_path(&mut self, path: &str) -> Result<Option<Value>> {
        let (parents, key) = split_path(path);
        let mut removed = None;
        self.edit(|root| {
            let parent = object_at(root, &parents)?;
            removed = parent.shift_remove(key);
            Ok(())
        })?;
        Ok(removed)
    }

    /// Switches the parser syntax, carrying the JSX/TSX flag over.
    pub fn set_syntax(&mut self, syntax: Syntax) -> Result<()> {
        self.edit(|root| {
            let jsc = object_at(root, &["jsc"])?;
            let element_syntax = jsc
                .get("parser")
                .map(uses_element_syntax)
                .unwrap_or(false);

            let mut parser = Map::new();
            parser.insert("syntax".to_string(), Value::from(syntax.as_str()));
            parser.insert(
                syntax.element_flag().to_string(),
                Value::Bool(element_syntax),
            );
            jsc.insert("parser".to_string(), Value::Object(parser));
            Ok(())
        })
    }

    /// Sets `jsx` or `tsx`, whichever belongs to the active syntax.
    pub fn set_jsx_or_tsx(&mut self, enabled: bool) -> Result<()> {
        self.edit(|root| {
            let parser = object_at(root, &["jsc", "parser"])?;
            let syntax = parser_syntax(parser);
            parser.insert(syntax.element_flag().to_string(), Value::Bool(enabled));
            Ok(())
        })
    }

    pub fn set_target(&mut self, target: EsVersion) -> Result<()> {
        self.set_path("jsc.target", Value::from(target.as_str()))
    }

    pub fn set_module_type(&mut self, kind: ModuleKind) -> Result<()> {
        self.set_path("module.type", Value::from(kind.as_str()))
    }

    pub fn set_source_type(&mut self, source_type: IsModule) -> Result<()> {
        self.set_path("isModule", serde_json::to_value(source_type)?)
    }

    pub fn set_loose(&mut self, loose: bool) -> Result<()> {
        self.set_path("jsc.loose", Value::Bool(loose))
    }

    pub fn set_minify(&mut self, minify: bool) -> Result<()> {
        self.set_path("minify", Value::Bool(minify))
    }

    /// Switches `jsc.minify.compress` on or off.
    ///
    /// Turning it on from an off state installs the default record; an
    /// existing record is kept.
    pub fn set_compress(&mut self, enabled: bool) -> Result<()> {
        self.toggle_group(&["jsc", "minify"], "compress", enabled, default_compress_options)
    }

    /// Switches `jsc.minify.mangle` on or off.
    pub fn set_mangle(&mut self, enabled: bool) -> Result<()> {
        self.toggle_group(&["jsc", "minify"], "mangle", enabled, default_mangle_options)
    }

    /// Adds the default `env` record, or removes `env` entirely.
    pub fn set_env(&mut self, enabled: bool) -> Result<()> {
        self.edit(|root| {
            if !enabled {
                root.shift_remove("env");
                return Ok(());
            }
            if !root.get("env").is_some_and(Value::is_object) {
                root.insert("env".to_string(), default_env_options());
            }
            Ok(())
        })
    }

    /// Replaces the compress record.
    pub fn set_compress_options(&mut self, options: &CompressOptions) -> Result<()> {
        self.set_path("jsc.minify.compress", serde_json::to_value(options)?)
    }

    /// Replaces the mangle record.
    pub fn set_mangle_options(&mut self, options: &MangleOptions) -> Result<()> {
        self.set_path("jsc.minify.mangle", serde_json::to_value(options)?)
    }

    pub fn set_env_targets(&mut self, targets: &EnvTargets) -> Result<()> {
        self.set_path("env.targets", serde_json::to_value(targets)?)
    }

    pub fn set_bugfixes(&mut self, bugfixes: bool) -> Result<()> {
        self.set_path("env.bugfixes", Value::Bool(bugfixes))
    }

    fn toggle_group(
        &mut self,
        parents: &[&str],
        key: &str,
        enabled: bool,
        defaults: fn() -> Value,
    ) -> Result<()> {
        self.edit(|root| {
            let parent = object_at(root, parents)?;
            if !enabled {
                parent.insert(key.to_string(), Value::Bool(false));
                return Ok(());
            }
            let is_off = match parent.get(key) {
                None | Some(Value::Null) | Some(Value::Bool(false)) => true,
                Some(_) => false,
            };
            if is_off {
                debug!(group = key, "installing default options");
                parent.insert(key.to_string(), defaults());
            }
            Ok(())
        })
    }

    fn edit(&mut self, apply: impl FnOnce(&mut Map<String, Value>) -> Result<()>) -> Result<()> {
        let mut value = self.parse()?;
        let root = value
            .as_object_mut()
            .ok_or_else(|| ConfigError::NotAnObject {
                path: String::new(),
            })?;
        apply(root)?;
        self.text = format_json(&value);
        Ok(())
    }
}

fn split_path(path: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = path.split('.').collect();
    // `split` always yields at least one segment.
    let key = segments.pop().unwrap_or(path);
    (segments, key)
}

/// Walks `keys` from `root`, creating missing objects along the way.
fn object_at<'a>(
    root: &'a mut Map<String, Value>,
    keys: &[&str],
) -> Result<&'a mut Map<String, Value>> {
    let mut current = root;
    for (depth, key) in keys.iter().enumerate() {
        let entry = current
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }
        current = entry
            .as_object_mut()
            .ok_or_else(|| ConfigError::NotAnObject {
                path: keys[..=depth].join("."),
            })?;
    }
    Ok(current)
}

fn parser_syntax(parser: &Map<String, Value>) -> Syntax {
    match parser.get("syntax").and_then(Value::as_str) {
        Some("typescript") => Syntax::Typescript,
        _ => Syntax::Ecmascript,
    }
}

fn uses_element_syntax(parser: &Value) -> bool {
    let Some(parser) = parser.as_object() else {
        return false;
    };
    let flag = parser_syntax(parser).element_flag();
    parser.get(flag).and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_document_is_pretty() {
        let document = ConfigDocument::default();
        assert!(document.text().starts_with("{\n  \"jsc\""));
        assert_eq!(document.formatted().unwrap(), document.text());
    }

    #[test]
    fn test_parse_tolerates_comments() {
        let document = ConfigDocument::new(
            r#"{
  // comment
  "jsc": { "target": "es2020", },
  /* block */
  "minify": true,
}"#,
        );
        let value = document.parse().unwrap();
        assert_eq!(value, json!({ "jsc": { "target": "es2020" }, "minify": true }));
    }

    #[test]
    fn test_parse_accepts_all_json() {
        let value = parse_jsonc("{\n  \"s\": \"\u{2028}x\u{2029}\"\n}").unwrap();
        assert_eq!(value, json!({ "s": "\u{2028}x\u{2029}" }));
        assert_eq!(parse_jsonc(&format_json(&value)).unwrap(), value);

        let value = parse_jsonc("{\n  \"n\": 18446744073709551615\n}").unwrap();
        assert_eq!(value["n"].as_u64(), Some(u64::MAX));
        assert_eq!(parse_jsonc(r#"{"passes": 3}"#).unwrap()["passes"].as_i64(), Some(3));
    }

    #[test]
    fn test_formatted_handles_separators_in_strings() {
        let mut document = ConfigDocument::new("{ \"jsc\": { \"x\": \"a\u{2028}b\" } }");
        document.format().unwrap();
        let once = document.text().to_string();
        assert_eq!(document.formatted().unwrap(), once);
        document.replace_text(once.clone()).unwrap();
        assert_eq!(document.text(), once);
    }

    #[test]
    fn test_replace_text_keeps_comments() {
        let mut document = ConfigDocument::default();
        let text = "{\n  // keep me\n  \"minify\": true\n}";
        document.replace_text(text).unwrap();
        assert_eq!(document.text(), text);
    }

    #[test]
    fn test_replace_text_rejects_invalid() {
        let mut document = ConfigDocument::default();
        let before = document.clone();
        let err = document.replace_text("{ \"jsc\": ").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax(_)));
        assert_eq!(document, before);
    }

    #[test]
    fn test_set_path_creates_parents() {
        let mut document = ConfigDocument::new("{}");
        document.set_path("jsc.transform.react.runtime", json!("automatic")).unwrap();
        assert_eq!(
            document.get_path("jsc.transform.react.runtime").unwrap(),
            Some(json!("automatic"))
        );
    }

    #[test]
    fn test_set_path_through_scalar_fails() {
        let mut document = ConfigDocument::new(r#"{ "jsc": 1 }"#);
        let err = document.set_path("jsc.target", json!("es5")).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { ref path } if path == "jsc"));
    }

    #[test]
    fn test_remove_path() {
        let mut document = ConfigDocument::default();
        let removed = document.remove_path("module.type").unwrap();
        assert_eq!(removed, Some(json!("es6")));
        assert_eq!(document.get_path("module").unwrap(), Some(json!({})));
    }

    #[test]
    fn test_set_syntax_carries_flag() {
        let mut document = ConfigDocument::default();
        document.set_jsx_or_tsx(true).unwrap();
        document.set_syntax(Syntax::Typescript).unwrap();
        assert_eq!(
            document.get_path("jsc.parser").unwrap(),
            Some(json!({ "syntax": "typescript", "tsx": true }))
        );
        assert_eq!(document.typed().unwrap().file_name(), "input.tsx");

        document.set_syntax(Syntax::Ecmascript).unwrap();
        assert_eq!(
            document.get_path("jsc.parser").unwrap(),
            Some(json!({ "syntax": "ecmascript", "jsx": true }))
        );
    }

    #[test]
    fn test_compress_toggle_installs_defaults() {
        let mut document = ConfigDocument::default();
        document.set_compress(true).unwrap();
        assert_eq!(
            document.get_path("jsc.minify.compress").unwrap(),
            Some(default_compress_options())
        );

        document.set_compress(false).unwrap();
        assert_eq!(document.get_path("jsc.minify.compress").unwrap(), Some(json!(false)));
    }

    #[test]
    fn test_compress_toggle_keeps_existing_record() {
        let mut document =
            ConfigDocument::new(r#"{ "jsc": { "minify": { "compress": { "passes": 3 } } } }"#);
        document.set_compress(true).unwrap();
        assert_eq!(
            document.get_path("jsc.minify.compress").unwrap(),
            Some(json!({ "passes": 3 }))
        );
    }

    #[test]
    fn test_mangle_toggle_from_missing_minify() {
        let mut document = ConfigDocument::new("{}");
        document.set_mangle(true).unwrap();
        assert!(document.typed().unwrap().mangle_enabled());
        assert_eq!(
            document.get_path("jsc.minify.mangle").unwrap(),
            Some(default_mangle_options())
        );
    }

    #[test]
    fn test_env_toggle() {
        let mut document = ConfigDocument::default();
        document.set_env(true).unwrap();
        assert_eq!(document.get_path("env").unwrap(), Some(json!({ "targets": "" })));

        document.set_env_targets(&EnvTargets::Query("defaults".to_string())).unwrap();
        document.set_bugfixes(true).unwrap();
        document.set_env(true).unwrap();
        assert_eq!(
            document.get_path("env").unwrap(),
            Some(json!({ "targets": "defaults", "bugfixes": true }))
        );

        document.set_env(false).unwrap();
        assert_eq!(document.get_path("env").unwrap(), None);
    }

    #[test]
    fn test_scalar_edits() {
        let mut document = ConfigDocument::default();
        document.set_target(EsVersion::Es2022).unwrap();
        document.set_module_type(ModuleKind::CommonJs).unwrap();
        document.set_source_type(IsModule::Unknown).unwrap();
        document.set_loose(true).unwrap();
        document.set_minify(true).unwrap();

        let config = document.typed().unwrap();
        assert_eq!(config.jsc.target, Some(EsVersion::Es2022));
        assert_eq!(config.module.map(|module| module.kind), Some(ModuleKind::CommonJs));
        assert_eq!(config.is_module, Some(IsModule::Unknown));
        assert_eq!(config.jsc.loose, Some(true));
        assert_eq!(config.minify, Some(true));
    }

    #[test]
    fn test_structured_edit_keeps_unknown_keys() {
        let mut document = ConfigDocument::new(
            r#"{ "jsc": { "externalHelpers": true }, "sourceMaps": "inline" }"#,
        );
        document.set_loose(true).unwrap();
        let value = document.parse().unwrap();
        assert_eq!(value["jsc"]["externalHelpers"], json!(true));
        assert_eq!(value["sourceMaps"], json!("inline"));
    }

    #[test]
    fn test_typed_options_edit() {
        let mut document = ConfigDocument::default();
        let options = MangleOptions {
            toplevel: Some(true),
            ..MangleOptions::default()
        };
        document.set_mangle_options(&options).unwrap();
        assert_eq!(
            document.get_path("jsc.minify.mangle").unwrap(),
            Some(json!({ "toplevel": true }))
        );
    }
}
