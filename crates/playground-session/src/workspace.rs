//! Dispatch of the compile call for the current view.

use playground_compiler::{CompilerFacade, CompilerOutput, CompilerResult};
use serde_json::Value;
use tracing::trace;

use crate::view::{ViewMode, file_name_for};

/// Runs the compile call the output pane needs.
///
/// The AST view parses and re-bases spans to start at zero. The code view
/// strips types when asked to and the compiler can, and transforms otherwise.
pub fn compile(
    facade: &CompilerFacade,
    code: &str,
    config: &Value,
    mode: ViewMode,
    strip_types: bool,
) -> CompilerResult<CompilerOutput> {
    match mode {
        ViewMode::Ast => {
            let mut ast = facade.parse(code, config)?;
            ast.rebase();
            Ok(ast.into())
        }
        ViewMode::Code => {
            let file_name = file_name_for(config);
            if strip_types && facade.has_strip_types() {
                trace!(file_name, "stripping types");
                Ok(facade.strip_types(code, file_name, config)?.into())
            } else {
                trace!(file_name, "transforming");
                Ok(facade.transform(code, file_name, config)?.into())
            }
        }
    }
}
