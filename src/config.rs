//! Run configuration, assembled from CLI arguments and (optionally) a
//! loaded compilation database. Threaded down into the driver (C7) as a
//! single bag, the way `llmgrep::query::options::SearchOptions` bundles a
//! run's knobs for its search pipeline.

use std::path::PathBuf;

/// The fully-resolved configuration for one analysis run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Destination for the JSON summary.
    pub output_filename: PathBuf,
    /// Directory to search for `compile_commands.json`, if any.
    pub compile_commands_dir: Option<PathBuf>,
    /// Positional source paths given on the command line.
    pub source_paths: Vec<PathBuf>,
}

impl Config {
    pub const DEFAULT_OUTPUT_FILENAME: &'static str = "node-summary.json";

    pub fn new(source_paths: Vec<PathBuf>) -> Self {
        Config {
            output_filename: PathBuf::from(Self::DEFAULT_OUTPUT_FILENAME),
            compile_commands_dir: None,
            source_paths,
        }
    }
}
