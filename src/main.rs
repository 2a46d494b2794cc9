//! Command-line entry point for nodescope.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use nodescope::config::Config;
use nodescope::error::NodescopeError;
use nodescope::{diagnostics, serializer};

#[derive(Parser)]
#[command(
    name = "nodescope",
    version = env!("CARGO_PKG_VERSION"),
    about = "Recover a robotics node's architecture (topics, services, parameters) by static symbolic analysis"
)]
struct Cli {
    /// Rust source files to analyze. Ignored when `--compile-commands-dir` is given.
    sources: Vec<PathBuf>,

    /// Directory to search for a `compile_commands.json` manifest, used in place of the
    /// positional source list when given.
    #[arg(short = 'p', long = "compile-commands-dir")]
    compile_commands_dir: Option<PathBuf>,

    /// The name of the file to which the node summary should be written.
    #[arg(long = "output-filename", value_name = "filename", default_value = "node-summary.json")]
    output_filename: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            emit_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), NodescopeError> {
    let mut config = Config::new(cli.sources.clone());
    config.compile_commands_dir = cli.compile_commands_dir.clone();
    config.output_filename = cli.output_filename.clone();
    let program = nodescope::run(&config)?;
    serializer::write_output(&program, &config.output_filename)
}

fn emit_error(err: &NodescopeError) {
    diagnostics::fatal(err);
    eprintln!("ERROR [{}]: {}", err.error_code(), err);
    if let Some(hint) = err.remediation() {
        eprintln!("Hint: {}", hint);
    }
}
