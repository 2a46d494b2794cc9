//! Error types for nodescope.
//!
//! Error codes are organized by category:
//!
//! - **NS-E001 to NS-E099**: input and compilation-database errors
//! - **NS-E100 to NS-E199**: parse and frontend errors
//! - **NS-E200 to NS-E299**: call-graph and symbolization errors
//! - **NS-E900 to NS-E999**: internal and I/O errors

use thiserror::Error;

/// Main error type for nodescope operations.
///
/// Each variant is classified by [`NodescopeError::severity`] as either
/// fatal (aborts the process) or recoverable (logged, analysis continues
/// with `Unknown` substituted or the offending statement skipped).
#[derive(Error, Debug)]
pub enum NodescopeError {
    /// A positional source path does not exist.
    #[error("source file not found: {path}")]
    SourceNotFound { path: String },

    /// The compilation database file exists but is not valid JSON, or does
    /// not match the expected `{directory, file, arguments}` shape.
    #[error("compilation database corrupted: {reason}")]
    CompilationDatabaseCorrupted { reason: String },

    /// `syn` failed to parse a translation unit into an AST.
    #[error("failed to parse {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    /// An indirect or otherwise unresolved callee was encountered while
    /// lowering a call site. Recorded as a diagnostic and the call is
    /// skipped; this variant exists so the driver can report the condition
    /// through the same error type used elsewhere.
    #[error("unresolved callee in {caller}: {callee_expr}")]
    UnresolvedCallee { caller: String, callee_expr: String },

    /// An IR invariant was violated during symbolization (e.g. a
    /// `VariableReference` constructed without a backing local). This
    /// indicates a bug in the symbolizer itself, not a property of the
    /// analyzed source, and is always fatal.
    #[error("IR invariant violated: {reason}")]
    InvariantViolation { reason: String },

    /// I/O error occurred (reading a source file, the compilation
    /// database, or writing the output summary).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error occurred.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl NodescopeError {
    /// Returns the error code for this error.
    pub const fn error_code(&self) -> &'static str {
        match self {
            NodescopeError::SourceNotFound { .. } => "NS-E001",
            NodescopeError::CompilationDatabaseCorrupted { .. } => "NS-E002",
            NodescopeError::ParseFailed { .. } => "NS-E101",
            NodescopeError::UnresolvedCallee { .. } => "NS-E201",
            NodescopeError::InvariantViolation { .. } => "NS-E202",
            NodescopeError::IoError(_) => "NS-E901",
            NodescopeError::JsonError(_) => "NS-E902",
        }
    }

    /// Returns whether this error is fatal (aborts the process) or
    /// recoverable (logged, analysis continues).
    pub const fn severity(&self) -> &'static str {
        match self {
            NodescopeError::SourceNotFound { .. } => "fatal",
            NodescopeError::CompilationDatabaseCorrupted { .. } => "fatal",
            NodescopeError::ParseFailed { .. } => "fatal",
            NodescopeError::UnresolvedCallee { .. } => "recoverable",
            NodescopeError::InvariantViolation { .. } => "fatal",
            NodescopeError::IoError(_) => "fatal",
            NodescopeError::JsonError(_) => "fatal",
        }
    }

    /// Returns remediation hints for this error, if available.
    pub const fn remediation(&self) -> Option<&'static str> {
        match self {
            NodescopeError::SourceNotFound { .. } => {
                Some("Check that the source path is correct and readable.")
            }
            NodescopeError::CompilationDatabaseCorrupted { .. } => Some(
                "Ensure compile_commands.json contains an array of {directory, file, arguments} entries.",
            ),
            NodescopeError::ParseFailed { .. } => {
                Some("The file must be syntactically valid Rust; check for unclosed items or unstable syntax.")
            }
            NodescopeError::UnresolvedCallee { .. } => {
                Some("Indirect calls through function pointers or trait objects cannot be resolved statically.")
            }
            NodescopeError::InvariantViolation { .. } => {
                Some("This is a nodescope bug; please file an issue with the input that triggered it.")
            }
            NodescopeError::IoError(_) => Some("Check file permissions and disk space."),
            NodescopeError::JsonError(_) => {
                Some("JSON serialization error. This may indicate corrupted input data.")
            }
        }
    }
}
