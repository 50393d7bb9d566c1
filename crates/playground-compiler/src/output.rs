//! Successful compile results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ast::ParsedAst;
use crate::thrown::CompileError;

/// Result of a compile call: output on success, normalized error text otherwise.
pub type CompilerResult<T> = std::result::Result<T, CompileError>;

/// Output of `transformSync`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformOutput {
    /// Generated code.
    pub code: String,

    /// Source map, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,

    /// Extra output channel, used for isolated declarations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Any other fields the compiler returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Output of the type-stripping module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripTypesOutput {
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Any successful compile result.
#[derive(Debug, Clone, PartialEq)]
pub enum CompilerOutput {
    Transformed(TransformOutput),
    Ast(ParsedAst),
    StrippedTypes(StripTypesOutput),
}

impl CompilerOutput {
    /// The output as the JSON value the compiler returned.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let value = match self {
            Self::Transformed(output) => serde_json::to_value(output),
            Self::Ast(ast) => Ok(ast.tree.clone()),
            Self::StrippedTypes(output) => serde_json::to_value(output),
        };
        // Both output structs serialize to plain objects.
        value.unwrap_or(Value::Null)
    }
}

impl From<TransformOutput> for CompilerOutput {
    fn from(output: TransformOutput) -> Self {
        Self::Transformed(output)
    }
}

impl From<ParsedAst> for CompilerOutput {
    fn from(ast: ParsedAst) -> Self {
        Self::Ast(ast)
    }
}

impl From<StripTypesOutput> for CompilerOutput {
    fn from(output: StripTypesOutput) -> Self {
        Self::StrippedTypes(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_output_keeps_extra_fields() {
        let output: TransformOutput = serde_json::from_value(json!({
            "code": "var x = 1;\n",
            "diagnostics": []
        }))
        .unwrap();
        assert_eq!(output.code, "var x = 1;\n");
        assert_eq!(output.map, None);
        assert_eq!(output.extra["diagnostics"], json!([]));

        let value = CompilerOutput::from(output).to_value();
        assert_eq!(value, json!({ "code": "var x = 1;\n", "diagnostics": [] }));
    }

    #[test]
    fn test_missing_code_is_rejected() {
        let result: serde_json::Result<TransformOutput> =
            serde_json::from_value(json!({ "map": "{}" }));
        assert!(result.is_err());
    }
}
