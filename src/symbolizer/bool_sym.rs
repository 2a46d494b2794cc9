//! The boolean value symbolizer.

use syn::{Expr, Lit, UnOp};

use super::expr_sym::binary;
use super::{peel, SymbolizerCtx};
use crate::diagnostics;
use crate::ir::{SymbolicType, Value};
use crate::scope::Binding;

pub fn symbolize_bool(expr: &Expr, ctx: &SymbolizerCtx) -> Value {
    let expr = peel(expr);
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Bool(b) => Value::BoolLiteral(b.value),
            _ => {
                diagnostics::recoverable("bool_sym", "non-bool literal in bool position");
                Value::unknown(SymbolicType::Bool)
            }
        },
        Expr::Path(path) => {
            let Some(ident) = path.path.get_ident() else {
                diagnostics::recoverable("bool_sym", "non-identifier path");
                return Value::unknown(SymbolicType::Bool);
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
        Expr::Binary(bin) => binary(bin, ctx).unwrap_or_else(|| {
            diagnostics::recoverable("bool_sym", "unsupported binary operator");
            Value::unknown(SymbolicType::Bool)
        }),
        Expr::Unary(unary) => match unary.op {
            UnOp::Not(_) => Value::Negate(Box::new(symbolize_bool(&unary.expr, ctx))),
            _ => {
                diagnostics::recoverable("bool_sym", "unsupported unary operator");
                Value::unknown(SymbolicType::Bool)
            }
        },
        _ => {
            diagnostics::recoverable("bool_sym", "unrecognized expression shape");
            Value::unknown(SymbolicType::Bool)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::LocalRef;
    use crate::scope::Scope;
    use syn::parse_quote;

    #[test]
    fn literal_lifts_directly() {
        let expr: Expr = parse_quote!(true);
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_bool(&expr, &ctx), Value::BoolLiteral(true));
    }

    #[test]
    fn negation_wraps_inner() {
        let arg: syn::FnArg = parse_quote!(enabled: bool);
        let mut scope = Scope::new();
        scope.add_parameter(0, &arg);
        let expr: Expr = parse_quote!(!enabled);
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(
            symbolize_bool(&expr, &ctx),
            Value::Negate(Box::new(Value::VariableReference(LocalRef::Parameter(0))))
        );
    }

    #[test]
    fn variable_reference_resolves_parameter() {
        let arg: syn::FnArg = parse_quote!(use_sensor: bool);
        let mut scope = Scope::new();
        scope.add_parameter(0, &arg);
        let expr: Expr = parse_quote!(use_sensor);
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(
            symbolize_bool(&expr, &ctx),
            Value::VariableReference(LocalRef::Parameter(0))
        );
    }
}
