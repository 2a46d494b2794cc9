//! The integer value symbolizer.
//!
//! Unlike the other four sub-symbolizers, this one runs a constant-folding
//! pass ([`fold_const`]) before falling through to structural dispatch, per
//! §4.3/§9: without it, `1 + 1` or a `const` arithmetic expression would
//! degrade to `Unknown` instead of the `IntLiteral` a reader expects. The
//! float symbolizer deliberately does not do this (see `float_sym.rs`).

use syn::{BinOp, Expr, Lit, UnOp};

use super::{peel, SymbolizerCtx};
use crate::diagnostics;
use crate::ir::{LocalRef, SymbolicType, Value};
use crate::scope::Binding;

pub fn symbolize_int(expr: &Expr, ctx: &SymbolizerCtx) -> Value {
    let expr = peel(expr);
    if let Some(n) = fold_const(expr) {
        return Value::IntLiteral(n);
    }
    match expr {
        Expr::Path(path) => {
            let Some(ident) = path.path.get_ident() else {
                diagnostics::recoverable("int_sym", "non-identifier path");
                return Value::unknown(SymbolicType::Integer);
            };
            let name = ident.to_string();
            match ctx.scope.lookup(&name) {
                // See `expr_sym.rs`: a dropped (unsupported-type) parameter
                // falls through to `Call(name)` rather than dangling.
                Some((local_ref, Binding::Value(ty))) if ty != SymbolicType::Unknown => {
                    Value::VariableReference(local_ref)
                }
                _ => Value::Call(name),
            }
        }
        _ => {
            diagnostics::recoverable("int_sym", "unrecognized expression shape");
            Value::unknown(SymbolicType::Integer)
        }
    }
}

/// Fold a literal-only integer expression, mirroring the frontend constant
/// evaluator the original symbolizer consults before structural dispatch.
/// Handles integer literals, unary negation, and `+ - * /` over already-
/// foldable operands; anything referencing a variable is not constant and
/// returns `None`.
fn fold_const(expr: &Expr) -> Option<i64> {
    let expr = peel(expr);
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Int(i) => i.base10_parse::<i64>().ok(),
            _ => None,
        },
        Expr::Unary(unary) => match unary.op {
            UnOp::Neg(_) => fold_const(&unary.expr).map(|n| -n),
            _ => None,
        },
        Expr::Binary(binary) => {
            let lhs = fold_const(&binary.left)?;
            let rhs = fold_const(&binary.right)?;
            match binary.op {
                BinOp::Add(_) => Some(lhs + rhs),
                BinOp::Sub(_) => Some(lhs - rhs),
                BinOp::Mul(_) => Some(lhs * rhs),
                BinOp::Div(_) if rhs != 0 => Some(lhs / rhs),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use syn::parse_quote;

    #[test]
    fn literal_folds_directly() {
        let expr: Expr = parse_quote!(10);
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_int(&expr, &ctx), Value::IntLiteral(10));
    }

    #[test]
    fn arithmetic_over_literals_folds() {
        let expr: Expr = parse_quote!(1 + 2 * 3);
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_int(&expr, &ctx), Value::IntLiteral(7));
    }

    #[test]
    fn unary_negation_folds() {
        let expr: Expr = parse_quote!(-5);
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_int(&expr, &ctx), Value::IntLiteral(-5));
    }

    #[test]
    fn variable_reference_is_not_constant() {
        let arg: syn::FnArg = parse_quote!(queue_size: u32);
        let mut scope = Scope::new();
        scope.add_parameter(0, &arg);
        let expr: Expr = parse_quote!(queue_size);
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(
            symbolize_int(&expr, &ctx),
            Value::VariableReference(LocalRef::Parameter(0))
        );
    }

    #[test]
    fn division_by_zero_does_not_fold() {
        let expr: Expr = parse_quote!(1 / 0);
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_int(&expr, &ctx), Value::unknown(SymbolicType::Integer));
    }
}
