//! Output Serializer (C8).
//!
//! Renders a [`SymbolicProgram`] to the pretty-printed JSON summary shape
//! (§6), the way `llmgrep::main::render_json_response` turns a query
//! response into `serde_json::to_string_pretty` output: the IR already
//! knows how to lower itself (`SymbolicProgram::to_json`), so this module
//! is only the thin glue that writes the rendered payload to the
//! configured file and echoes it to stdout.

use std::fs;
use std::path::Path;

use crate::error::NodescopeError;
use crate::ir::SymbolicProgram;

/// Render `program` to its canonical JSON form.
pub fn render(program: &SymbolicProgram) -> serde_json::Value {
    program.to_json()
}

/// Pretty-print `program` and write it both to `output_path` and to
/// stdout (§6: the summary is always echoed, regardless of whether a file
/// destination was also written).
pub fn write_output(program: &SymbolicProgram, output_path: &Path) -> Result<(), NodescopeError> {
    let rendered = serde_json::to_string_pretty(&render(program))?;
    fs::write(output_path, &rendered)?;
    println!("{rendered}");
    Ok(())
}
