//! The float value symbolizer.
//!
//! Deliberately does not run a constant-folding pass before dispatch: the
//! original frontend's `FloatSymbolizer` never consults the constant
//! evaluator `ExprSymbolizer`/the integer path does, so `1.0 + 1.0` lifts
//! to `Unknown` rather than `FloatLiteral(2.0)` here, matching that
//! asymmetry (see `SPEC_FULL.md`).

use syn::{Expr, Lit};

use super::{peel, SymbolizerCtx};
use crate::diagnostics;
use crate::ir::{SymbolicType, Value};
use crate::scope::Binding;

pub fn symbolize_float(expr: &Expr, ctx: &SymbolizerCtx) -> Value {
    let expr = peel(expr);
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Float(f) => f
                .base10_parse::<f64>()
                .map(Value::FloatLiteral)
                .unwrap_or_else(|_| Value::unknown(SymbolicType::Float)),
            // Numeric-to-float cross-lift is permitted for an integer literal
            // in float position (§4.3).
            Lit::Int(i) => i
                .base10_parse::<i64>()
                .map(|n| Value::FloatLiteral(n as f64))
                .unwrap_or_else(|_| Value::unknown(SymbolicType::Float)),
            _ => {
                diagnostics::recoverable("float_sym", "non-numeric literal in float position");
                Value::unknown(SymbolicType::Float)
            }
        },
        Expr::Path(path) => {
            let Some(ident) = path.path.get_ident() else {
                diagnostics::recoverable("float_sym", "non-identifier path");
                return Value::unknown(SymbolicType::Float);
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
            diagnostics::recoverable("float_sym", "unrecognized expression shape");
            Value::unknown(SymbolicType::Float)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use syn::parse_quote;

    #[test]
    fn float_literal_lifts_directly() {
        let expr: Expr = parse_quote!(10.0);
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_float(&expr, &ctx), Value::FloatLiteral(10.0));
    }

    #[test]
    fn integer_literal_cross_lifts_to_float() {
        let expr: Expr = parse_quote!(10);
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_float(&expr, &ctx), Value::FloatLiteral(10.0));
    }

    #[test]
    fn arithmetic_does_not_fold() {
        let expr: Expr = parse_quote!(1.0 + 1.0);
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_float(&expr, &ctx), Value::unknown(SymbolicType::Float));
    }
}
