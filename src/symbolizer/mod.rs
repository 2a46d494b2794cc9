//! Value Symbolizers (C3): five sub-symbolizers, one per target semantic
//! type, each lifting an AST expression into a [`crate::ir::Value`].
//!
//! Every symbolizer first calls [`peel`] to transparently strip
//! parenthesization, casts, and reference/deref wrappers — the Rust
//! equivalents of the original's temporary-binding and
//! materialize-temporary wrappers (§4.3) — before dispatching on the
//! remaining node shape. Peeling is idempotent by construction: running it
//! again on its own output is a no-op, which is what gives property §8.1
//! (idempotence of transparent wrappers) for free.

mod bool_sym;
mod expr_sym;
mod float_sym;
mod int_sym;
mod string_sym;

pub use bool_sym::symbolize_bool;
pub use expr_sym::symbolize_expr;
pub use float_sym::symbolize_float;
pub use int_sym::symbolize_int;
pub use string_sym::symbolize_string;

use syn::Expr;

use crate::scope::Scope;

/// Strip a layer of parentheses, an explicit `as` cast, or a `&`/`&mut`/`*`
/// reference wrapper, returning the inner expression. Returns `expr`
/// unchanged if none apply.
pub fn peel(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(inner) => peel(&inner.expr),
        Expr::Group(inner) => peel(&inner.expr),
        Expr::Cast(inner) => peel(&inner.expr),
        Expr::Reference(inner) => peel(&inner.expr),
        Expr::Unary(inner) if matches!(inner.op, syn::UnOp::Deref(_)) => peel(&inner.expr),
        _ => expr,
    }
}

/// Shared context threaded through every sub-symbolizer: the enclosing
/// function's scope, used to resolve `VariableReference`/`Call` targets.
pub struct SymbolizerCtx<'a> {
    pub scope: &'a Scope,
}
