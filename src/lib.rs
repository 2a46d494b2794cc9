//! nodescope - Static architecture recovery for robotics nodes.
//!
//! Given a set of Rust translation units implementing one or more
//! robotics-node binaries, nodescope recovers a whole-program symbolic
//! summary of the topics they publish and subscribe to, the services they
//! provide and call, and the parameters they read and write — each
//! annotated with the path condition under which it executes — without
//! ever running the analyzed program.
//!
//! # Quick Start
//!
//! ```no_run
//! use nodescope::config::Config;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(vec![PathBuf::from("src/talker.rs")]);
//! let program = nodescope::run(&config)?;
//! println!("{}", program.to_json());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`catalog`] - API call catalog (C2): recognizes robotics-API call shapes
//! - [`compdb`] - Compilation database loading
//! - [`config`] - Run configuration
//! - [`diagnostics`] - The diagnostics stream
//! - [`driver`] - Call-graph driver / whole-program symbolizer (C7)
//! - [`error`] - Error types
//! - [`function_symbolizer`] - Per-function symbolization (C4, C5, C6)
//! - [`guard`] - Path-condition builder (C6)
//! - [`ir`] - The Symbolic IR (C1)
//! - [`ordering`] - Statement ordering (C4) shared types
//! - [`scope`] - Per-function variable scope
//! - [`serializer`] - Output serialization (C8)
//! - [`symbolizer`] - Value symbolizers (C3)

pub mod catalog;
pub mod compdb;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod function_symbolizer;
pub mod guard;
pub mod ir;
pub mod ordering;
pub mod scope;
pub mod serializer;
pub mod symbolizer;

pub use config::Config;
pub use error::NodescopeError;
pub use ir::SymbolicProgram;

/// Run the whole pipeline for one configuration: load (or synthesize) the
/// compilation database, parse and symbolize every translation unit, and
/// return the resulting whole-program summary. Does not write output;
/// callers that want the file-plus-stdout side effect use
/// [`serializer::write_output`] on the result.
pub fn run(config: &Config) -> Result<SymbolicProgram, NodescopeError> {
    let units = match &config.compile_commands_dir {
        Some(dir) => {
            let path = dir.join("compile_commands.json");
            compdb::load(&path)?
        }
        None => compdb::from_source_paths(&config.source_paths),
    };
    driver::build_program(&units)
}
