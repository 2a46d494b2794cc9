//! Compilation database loading.
//!
//! A compilation database is a JSON array of entries shaped like clang's
//! `compile_commands.json`: `{"directory", "file", "arguments"}`. `syn`
//! parses a file directly without invoking a real compiler, so `arguments`
//! is retained only for diagnostics/provenance (it is never executed) — see
//! `SPEC_FULL.md`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::NodescopeError;

/// One translation unit: a source file plus the working directory its
/// (never-executed) compiler invocation would have run from.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationUnit {
    pub directory: PathBuf,
    pub file: PathBuf,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// Load a `compile_commands.json`-shaped manifest from `path`.
pub fn load(path: &Path) -> Result<Vec<TranslationUnit>, NodescopeError> {
    let text = fs::read_to_string(path)?;
    let units: Vec<TranslationUnit> = serde_json::from_str(&text).map_err(|e| {
        NodescopeError::CompilationDatabaseCorrupted {
            reason: e.to_string(),
        }
    })?;
    Ok(units)
}

/// Build a one-entry-per-file manifest for a bare list of positional source
/// paths, used when no compilation database is supplied or found. Each file
/// is its own translation unit with `directory` set to its parent.
pub fn from_source_paths(paths: &[PathBuf]) -> Vec<TranslationUnit> {
    paths
        .iter()
        .map(|file| TranslationUnit {
            directory: file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            file: file.clone(),
            arguments: Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_well_formed_manifest() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"directory": "/repo", "file": "/repo/src/main.rs", "arguments": ["rustc", "main.rs"]}}]"#
        )
        .unwrap();
        let units = load(file.path()).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].file, PathBuf::from("/repo/src/main.rs"));
    }

    #[test]
    fn rejects_malformed_manifest() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load(file.path()).unwrap_err();
        assert_eq!(err.error_code(), "NS-E002");
    }

    #[test]
    fn bare_paths_become_single_file_units() {
        let units = from_source_paths(&[PathBuf::from("/repo/src/talker.rs")]);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].directory, PathBuf::from("/repo/src"));
    }
}
