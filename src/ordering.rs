//! Statement Ordering (C4).
//!
//! A single post-order traversal of the function body visits every node
//! exactly once and in the order a straight-line executor would reach it;
//! whenever the visited node is a recognized API call or a resolvable
//! inter-procedural call, it is appended to the output (§4.4). The function
//! symbolizer's hand-rolled recursive descent performs this traversal
//! directly rather than collecting a separate node set first — see
//! `function_symbolizer.rs` (a generic `syn::visit::Visit` implementation
//! cannot thread the live `Scope`/`GuardStack` state the walk needs at
//! each node, so the descent is written by hand instead). This module
//! holds the shared
//! [`RawStatement`] record the traversal appends to, plus source-location
//! formatting, since both the catalog path and the inter-procedural-call
//! path need the same shape.

use proc_macro2::Span;

use crate::catalog::ApiKind;
use crate::ir::Value;

/// One AST site discovered during the post-order traversal, carrying
/// whatever the later lifting phase needs: which kind of raw statement it
/// is, its accumulated guard at the point of traversal, and its source
/// location.
pub enum RawStatementKind<'ast> {
    ApiCall {
        kind: ApiKind,
        name_arg: &'ast syn::Expr,
        secondary_arg: Option<&'ast syn::Expr>,
        /// The simple identifier a reading call's return value is directly
        /// `let`-bound to, when the call site *is* a `let` initializer.
        /// `None` when the call appears anywhere else (nested inside
        /// another expression, or as a bare expression statement) — C5
        /// synthesizes a fresh anonymous local for those instead of
        /// reusing a named one.
        let_target: Option<String>,
    },
    InterProcCall {
        callee: String,
        arguments: Vec<&'ast syn::Expr>,
    },
}

pub struct RawStatement<'ast> {
    pub kind: RawStatementKind<'ast>,
    pub guard: Option<Value>,
    pub source_location: String,
}

/// Render a span as a `file:line:column` string. `file` is the path the
/// driver is currently processing, not derived from the span itself (`syn`
/// spans do not carry a file name, only position within the parsed buffer).
pub fn format_location(file: &str, span: Span) -> String {
    let start = span.start();
    format!("{file}:{}:{}", start.line, start.column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_location_includes_file_and_position() {
        let tokens: proc_macro2::TokenStream = "1 + 1".parse().unwrap();
        let span = tokens.into_iter().next().unwrap().span();
        let loc = format_location("talker.rs", span);
        assert!(loc.starts_with("talker.rs:"));
    }
}
