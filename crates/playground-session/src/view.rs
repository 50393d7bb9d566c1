//! Facts derived from the session for the editors and form controls.
//!
//! Nothing here is stored: every value is recomputed from the current
//! configuration and compile result.

use std::fmt;
use std::str::FromStr;

use playground_compiler::{CompileError, CompilerOutput, CompilerResult, strip_ansi};
use playground_config::{CompilerConfig, Syntax, format_json, source_file_name};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which the compiler reports isolated declarations.
pub const ISOLATED_DECLARATIONS_KEY: &str = "__swc_isolated_declarations__";

/// What the output pane shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Compiled code.
    #[default]
    Code,
    /// The syntax tree as JSON.
    Ast,
}

impl ViewMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Ast => "ast",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Code => "Compiled Code",
            Self::Ast => "JSON AST",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "ast" => Ok(Self::Ast),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

/// Editor language of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Text,
    Javascript,
    Typescript,
    Json,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Json => "json",
        }
    }
}

/// Text for the output editor with its language and virtual path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOutput {
    pub text: String,
    pub language: Language,
    pub path: &'static str,
}

impl RenderedOutput {
    /// Error text with escape sequences removed.
    #[must_use]
    pub fn error(err: &CompileError) -> Self {
        Self {
            text: strip_ansi(err.message()).into_owned(),
            language: Language::Text,
            path: "error.log",
        }
    }

    /// Picks a rendering by the shape of a compiler result.
    ///
    /// An `output` string carrying isolated declarations wins over `code`;
    /// anything without a `code` string is shown as JSON.
    #[must_use]
    pub fn classify(value: &Value) -> Self {
        if let Some(declarations) = isolated_declarations(value) {
            return Self {
                text: declarations,
                language: Language::Typescript,
                path: "output.d.ts",
            };
        }
        if let Some(code) = value.get("code").and_then(Value::as_str) {
            return Self {
                text: code.to_string(),
                language: Language::Javascript,
                path: "output.js",
            };
        }
        Self {
            text: format_json(value),
            language: Language::Json,
            path: "output.json",
        }
    }
}

fn isolated_declarations(value: &Value) -> Option<String> {
    let output = value.get("output")?.as_str()?;
    let parsed: Value = serde_json::from_str(output).ok()?;
    parsed
        .get(ISOLATED_DECLARATIONS_KEY)?
        .as_str()
        .map(str::to_string)
}

/// Renders a compile result for the output editor.
#[must_use]
pub fn render_output(result: &CompilerResult<CompilerOutput>) -> RenderedOutput {
    match result {
        Ok(output) => RenderedOutput::classify(&output.to_value()),
        Err(err) => RenderedOutput::error(err),
    }
}

/// File name for a raw configuration value.
///
/// Reads `jsc.parser` directly so that configurations the typed view
/// rejects still get a name. Anything but `typescript` counts as ecmascript.
#[must_use]
pub fn file_name_for(config: &Value) -> &'static str {
    let parser = config.pointer("/jsc/parser");
    let flag = |name: &str| {
        parser
            .and_then(|parser| parser.get(name))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    };
    source_file_name(syntax_for(config), flag("jsx"), flag("tsx"))
}

/// Parser syntax of a raw configuration value.
#[must_use]
pub fn syntax_for(config: &Value) -> Syntax {
    match config.pointer("/jsc/parser/syntax").and_then(Value::as_str) {
        Some("typescript") => Syntax::Typescript,
        _ => Syntax::Ecmascript,
    }
}

/// Input editor language for a syntax.
#[must_use]
pub const fn input_language(syntax: Syntax) -> Language {
    match syntax {
        Syntax::Ecmascript => Language::Javascript,
        Syntax::Typescript => Language::Typescript,
    }
}

/// State of the configuration form controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub syntax: Syntax,
    /// `"jsx"` or `"tsx"`, whichever the syntax offers.
    pub element_flag: &'static str,
    pub element_syntax: bool,
    pub compress: bool,
    pub mangle: bool,
    pub env: bool,
    /// Strip-types switch is usable; needs a loaded type-stripping module.
    pub strip_types_enabled: bool,
}

impl Controls {
    #[must_use]
    pub fn derive(config: &CompilerConfig, has_strip_types: bool) -> Self {
        let syntax = config.jsc.parser.syntax();
        Self {
            syntax,
            element_flag: syntax.element_flag(),
            element_syntax: config.jsc.parser.uses_element_syntax(),
            compress: config.compress_enabled(),
            mangle: config.mangle_enabled(),
            env: config.env.is_some(),
            strip_types_enabled: has_strip_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_compiler::{ParsedAst, TransformOutput};
    use playground_config::{ConfigDocument, default_config};
    use serde_json::json;

    #[test]
    fn test_view_mode_strings() {
        assert_eq!("ast".parse::<ViewMode>().unwrap(), ViewMode::Ast);
        assert_eq!(ViewMode::default().to_string(), "code");
        assert!("tree".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_error_output_strips_colors() {
        let err = CompileError::new("\u{1b}[31mx\u{1b}[0m Expression expected");
        let rendered = render_output(&Err(err));
        assert_eq!(rendered.text, "x Expression expected");
        assert_eq!((rendered.language, rendered.path), (Language::Text, "error.log"));
    }

    #[test]
    fn test_code_output() {
        let rendered = RenderedOutput::classify(&json!({ "code": "var x = 1;\n", "map": null }));
        assert_eq!(rendered.text, "var x = 1;\n");
        assert_eq!(rendered.path, "output.js");
    }

    #[test]
    fn test_isolated_declarations_output() {
        let output = json!({ "__swc_isolated_declarations__": "export declare const x: number;\n" });
        let value = json!({ "code": "export const x = 1;", "output": output.to_string() });
        let rendered = RenderedOutput::classify(&value);
        assert_eq!(rendered.language, Language::Typescript);
        assert_eq!(rendered.path, "output.d.ts");
        assert_eq!(rendered.text, "export declare const x: number;\n");

        // An `output` without the marker falls back to the code
        let value = json!({ "code": "x", "output": "{\"other\":1}" });
        assert_eq!(RenderedOutput::classify(&value).path, "output.js");
        let value = json!({ "code": "x", "output": "not json" });
        assert_eq!(RenderedOutput::classify(&value).path, "output.js");
    }

    #[test]
    fn test_ast_output_is_json() {
        let ast = ParsedAst::new(json!({ "type": "Module", "body": [] }));
        let rendered = render_output(&Ok(CompilerOutput::from(ast)));
        assert_eq!(rendered.language, Language::Json);
        assert_eq!(rendered.text, "{\n  \"type\": \"Module\",\n  \"body\": []\n}");

        let output: TransformOutput = serde_json::from_value(json!({ "code": "1" })).unwrap();
        assert_eq!(render_output(&Ok(output.into())).path, "output.js");
    }

    #[test]
    fn test_file_name_for_raw_config() {
        let cases = [
            (json!({ "jsc": { "parser": { "syntax": "ecmascript" } } }), "input.js"),
            (json!({ "jsc": { "parser": { "syntax": "ecmascript", "jsx": true } } }), "input.jsx"),
            (json!({ "jsc": { "parser": { "syntax": "typescript", "jsx": true } } }), "input.ts"),
            (json!({ "jsc": { "parser": { "syntax": "typescript", "tsx": true } } }), "input.tsx"),
            (json!({}), "input.js"),
            (json!("legacy"), "input.js"),
        ];
        for (config, expected) in cases {
            assert_eq!(file_name_for(&config), expected, "{config}");
        }
    }

    #[test]
    fn test_input_language() {
        assert_eq!(input_language(Syntax::Ecmascript).as_str(), "javascript");
        assert_eq!(input_language(Syntax::Typescript).as_str(), "typescript");
    }

    #[test]
    fn test_controls() {
        let config: CompilerConfig = serde_json::from_value(default_config()).unwrap();
        let controls = Controls::derive(&config, false);
        assert_eq!(controls.element_flag, "jsx");
        assert!(!controls.compress && !controls.mangle && !controls.env);
        assert!(!controls.strip_types_enabled);

        let mut document = ConfigDocument::default();
        document.set_syntax(Syntax::Typescript).unwrap();
        document.set_jsx_or_tsx(true).unwrap();
        document.set_compress(true).unwrap();
        let controls = Controls::derive(&document.typed().unwrap(), true);
        assert_eq!(controls.syntax, Syntax::Typescript);
        assert_eq!(controls.element_flag, "tsx");
        assert!(controls.element_syntax && controls.compress);
        assert!(controls.strip_types_enabled);
    }
}
