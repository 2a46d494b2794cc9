//! The string value symbolizer.
//!
//! Departs from the generic symbolizer in one deliberate way: a bare
//! variable reference always lifts to `Unknown`, never
//! `VariableReference`. The original frontend's `StringSymbolizer` never
//! resolves a `DeclRefExpr` to a known string value — topic/service/param
//! *names* are treated as opaque once they are not literal text, since a
//! named string variable's contents cannot be recovered without running
//! the program. See scenario 4 in `spec.md` (`n.getParam(topic_name, x)`
//! where `topic_name` is a parameter).

use syn::{Expr, Lit};

use super::{peel, SymbolizerCtx};
use crate::diagnostics;
use crate::ir::{SymbolicType, Value};

pub fn symbolize_string(expr: &Expr, ctx: &SymbolizerCtx) -> Value {
    let expr = peel(expr);
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Str(s) => Value::StringLiteral(s.value()),
            _ => {
                diagnostics::recoverable("string_sym", "non-string literal in string position");
                Value::unknown(SymbolicType::String)
            }
        },
        Expr::Path(_) => Value::unknown(SymbolicType::String),
        Expr::MethodCall(call) if is_owned_conversion(&call.method.to_string()) => {
            symbolize_string(&call.receiver, ctx)
        }
        Expr::Call(call) => match string_constructor_argument(call) {
            Some(arg) => symbolize_string(arg, ctx),
            None => {
                diagnostics::recoverable("string_sym", "unrecognized constructor call");
                Value::unknown(SymbolicType::String)
            }
        },
        _ => {
            diagnostics::recoverable("string_sym", "unrecognized expression shape");
            Value::unknown(SymbolicType::String)
        }
    }
}

fn is_owned_conversion(method: &str) -> bool {
    matches!(method, "to_string" | "to_owned" | "into" | "as_str")
}

/// `String::from(arg)` — the one-argument standard-string-class
/// constructor form (§4.3). Any other free-function call is not a
/// constructor of the string type and falls through to `Unknown`.
fn string_constructor_argument(call: &syn::ExprCall) -> Option<&Expr> {
    let Expr::Path(path) = call.func.as_ref() else {
        return None;
    };
    let segments: Vec<_> = path.path.segments.iter().map(|s| s.ident.to_string()).collect();
    if segments == ["String", "from"] && call.args.len() == 1 {
        call.args.first()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use syn::parse_quote;

    #[test]
    fn literal_lifts_directly() {
        let expr: Expr = parse_quote!("chatter");
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_string(&expr, &ctx), Value::StringLiteral("chatter".into()));
    }

    #[test]
    fn bare_variable_reference_is_always_unknown() {
        let expr: Expr = parse_quote!(topic_name);
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_string(&expr, &ctx), Value::unknown(SymbolicType::String));
    }

    #[test]
    fn string_from_constructor_is_transparent() {
        let expr: Expr = parse_quote!(String::from("chatter"));
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_string(&expr, &ctx), Value::StringLiteral("chatter".into()));
    }

    #[test]
    fn to_string_conversion_is_transparent() {
        let expr: Expr = parse_quote!("chatter".to_string());
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_string(&expr, &ctx), Value::StringLiteral("chatter".into()));
    }

    #[test]
    fn parenthesized_literal_matches_bare_literal() {
        let bare: Expr = parse_quote!("chatter");
        let wrapped: Expr = parse_quote!(("chatter"));
        let scope = Scope::new();
        let ctx = SymbolizerCtx { scope: &scope };
        assert_eq!(symbolize_string(&bare, &ctx), symbolize_string(&wrapped, &ctx));
    }
}
