//! The diagnostics stream (§7).
//!
//! Thin wrappers over [`tracing`] that name the three classes of event the
//! pipeline emits: recoverable degradations (an unrecognized AST shape
//! substituted with `Unknown`), driver-level notices (first-seen-wins on a
//! duplicate qualified name), and fatal conditions immediately before the
//! process aborts. Centralizing them here keeps the log message shape
//! consistent without threading a logger handle through every symbolizer.

use crate::error::NodescopeError;

/// A symbolizer could not lift an expression and substituted `Unknown`.
pub fn recoverable(context: &str, reason: &str) {
    tracing::warn!(context, reason, "substituting Unknown");
}

/// The call-graph driver resolved a duplicate qualified name or skipped a
/// call site with no architectural effect.
pub fn notice(message: &str) {
    tracing::info!("{message}");
}

/// A fatal error is about to abort the process.
pub fn fatal(err: &NodescopeError) {
    tracing::error!(
        code = err.error_code(),
        remediation = err.remediation().unwrap_or(""),
        "{err}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_does_not_panic_without_remediation() {
        let err = NodescopeError::InvariantViolation {
            reason: "test".into(),
        };
        fatal(&err);
    }
}
