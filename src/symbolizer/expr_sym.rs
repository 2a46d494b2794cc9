//! The generic expression symbolizer.
//!
//! Used directly by the function symbolizer for call arguments whose
//! expected type is not known ahead of time (e.g. a `write_param` value
//! argument, or the operands of a comparison), and shared by the bool
//! symbolizer for its logical/comparison dispatch (§4.3, §9: "An
//! implementation may unify them around the generic symbolizer... or keep
//! the specializations for tighter error messages — either is acceptable").

use syn::{BinOp, Expr, Lit, UnOp};

use super::{peel, SymbolizerCtx};
use crate::diagnostics;
use crate::ir::{CompareOp, SymbolicType, Value};
use crate::scope::Binding;

pub fn symbolize_expr(expr: &Expr, ctx: &SymbolizerCtx) -> Value {
    let expr = peel(expr);
    match expr {
        Expr::Lit(lit) => literal_value(&lit.lit),
        Expr::Path(path) => {
            let Some(ident) = path.path.get_ident() else {
                diagnostics::recoverable("expr_sym", "non-identifier path");
                return Value::unknown(SymbolicType::Unknown);
            };
            let name = ident.to_string();
            match ctx.scope.lookup(&name) {
                // A parameter of unsupported type is dropped from the
                // function's serialized `parameters` list (driver.rs); a
                // `VariableReference` to it would dangle, so it falls
                // through to the same `Call(name)` fallback as a
                // `NodeHandle` receiver.
                Some((local_ref, Binding::Value(ty))) if ty != SymbolicType::Unknown => {
                    Value::VariableReference(local_ref)
                }
                _ => Value::Call(name),
            }
        }
        Expr::Binary(bin) => binary(bin, ctx)
            .unwrap_or_else(|| {
                diagnostics::recoverable("expr_sym", "unsupported binary operator");
                Value::unknown(SymbolicType::Unknown)
            }),
        Expr::Unary(unary) => match unary.op {
            UnOp::Not(_) => Value::Negate(Box::new(symbolize_expr(&unary.expr, ctx))),
            _ => {
                diagnostics::recoverable("expr_sym", "unsupported unary operator");
                Value::unknown(SymbolicType::Unknown)
            }
        },
        _ => {
            diagnostics::recoverable("expr_sym", "unrecognized expression shape");
            Value::unknown(SymbolicType::Unknown)
        }
    }
}

fn literal_value(lit: &Lit) -> Value {
    match lit {
        Lit::Str(s) => Value::StringLiteral(s.value()),
        Lit::Bool(b) => Value::BoolLiteral(b.value),
        Lit::Int(i) => i
            .base10_parse::<i64>()
            .map(Value::IntLiteral)
            .unwrap_or_else(|_| Value::unknown(SymbolicType::Integer)),
        Lit::Float(f) => f
            .base10_parse::<f64>()
            .map(Value::FloatLiteral)
            .unwrap_or_else(|_| Value::unknown(SymbolicType::Float)),
        _ => Value::unknown(SymbolicType::Unknown),
    }
}

/// Lift a binary operator, recursing into `symbolize_expr` for both
/// operands. Returns `None` for any operator that is neither logical
/// (`&&`, `||`) nor a comparison — those yield `Unknown` at the call site.
pub(super) fn binary(bin: &syn::ExprBinary, ctx: &SymbolizerCtx) -> Option<Value> {
    let op = compare_op(&bin.op);
    if let Some(op) = op {
        let lhs = symbolize_expr(&bin.left, ctx);
        let rhs = symbolize_expr(&bin.right, ctx);
        return Some(Value::Compare(Box::new(lhs), Box::new(rhs), op));
    }
    match bin.op {
        BinOp::And(_) => Some(Value::And(
            Box::new(symbolize_expr(&bin.left, ctx)),
            Box::new(symbolize_expr(&bin.right, ctx)),
        )),
        BinOp::Or(_) => Some(Value::Or(
            Box::new(symbolize_expr(&bin.left, ctx)),
            Box::new(symbolize_expr(&bin.right, ctx)),
        )),
        _ => None,
    }
}

fn compare_op(op: &BinOp) -> Option<CompareOp> {
    match op {
        BinOp::Eq(_) => Some(CompareOp::Eq),
        BinOp::Ne(_) => Some(CompareOp::Ne),
        BinOp::Lt(_) => Some(CompareOp::Lt),
        BinOp::Le(_) => Some(CompareOp::Le),
        BinOp::Gt(_) => Some(CompareOp::Gt),
        BinOp::Ge(_) => Some(CompareOp::Ge),
        _ => None,
    }
}
