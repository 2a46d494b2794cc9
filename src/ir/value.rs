//! Symbolic values (C1).
//!
//! A closed, tagged family of value nodes lifted from source expressions by
//! the symbolizers in [`crate::symbolizer`]. Every node exposes a canonical
//! textual form (via [`std::fmt::Display`], standing in for the original
//! `print(stream)` capability) and a [`Value::to_json`] method producing a
//! tagged object with a `kind` discriminator.

use std::fmt;

use serde_json::{json, Value as Json};

/// The closed set of symbolic types a [`Value`] can carry.
///
/// `Unsupported` is reserved for the declared type of a synthesized local
/// holding an otherwise-unrepresentable value; it never appears as the type
/// of a live, referenced value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolicType {
    String,
    Bool,
    Integer,
    Float,
    Unknown,
    Unsupported,
}

impl SymbolicType {
    pub const fn as_str(self) -> &'static str {
        match self {
            SymbolicType::String => "string",
            SymbolicType::Bool => "bool",
            SymbolicType::Integer => "integer",
            SymbolicType::Float => "float",
            SymbolicType::Unknown => "unknown",
            SymbolicType::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for SymbolicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operators supported by [`Value::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// A reference to a declaration in the enclosing [`crate::ir::SymbolicFunction`]
/// (invariant: every [`Value::VariableReference`] resolves to one of these).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalRef {
    /// Index into the function's ordered parameter map.
    Parameter(usize),
    /// Id of a locally declared (or synthesized) variable.
    Local(u32),
}

impl LocalRef {
    fn to_json(self) -> Json {
        match self {
            LocalRef::Parameter(index) => json!({"scope": "parameter", "index": index}),
            LocalRef::Local(id) => json!({"scope": "local", "id": id}),
        }
    }
}

impl fmt::Display for LocalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalRef::Parameter(index) => write!(f, "p{index}"),
            LocalRef::Local(id) => write!(f, "l{id}"),
        }
    }
}

/// The closed family of symbolic value nodes.
///
/// `ReadParam`, `ReadParamWithDefault`, and `HasParam` are value-shaped: they
/// only ever appear nested inside an [`crate::ir::Stmt::Assignment`]'s value
/// slot, never as a bare top-level statement (see `DESIGN.md` for why this
/// departs from a literal reading of the statement/value split).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    StringLiteral(String),
    IntLiteral(i64),
    BoolLiteral(bool),
    FloatLiteral(f64),
    Unknown(SymbolicType),
    VariableReference(LocalRef),
    Call(String),
    Compare(Box<Value>, Box<Value>, CompareOp),
    And(Box<Value>, Box<Value>),
    Or(Box<Value>, Box<Value>),
    Negate(Box<Value>),
    ReadParam(Box<Value>),
    ReadParamWithDefault(Box<Value>, Box<Value>),
    HasParam(Box<Value>),
}

impl Value {
    pub fn unknown(ty: SymbolicType) -> Value {
        Value::Unknown(ty)
    }

    /// True if this value is the literal `true` — the rendering of an empty
    /// guard conjunction (§4.6), which may be omitted from serialization.
    pub fn is_trivially_true(&self) -> bool {
        matches!(self, Value::BoolLiteral(true))
    }

    pub fn and(self, other: Value) -> Value {
        Value::And(Box::new(self), Box::new(other))
    }

    pub fn to_json(&self) -> Json {
        match self {
            Value::StringLiteral(s) => json!({"kind": "string-literal", "value": s}),
            Value::IntLiteral(n) => json!({"kind": "int-literal", "value": n}),
            Value::BoolLiteral(b) => json!({"kind": "bool-literal", "value": b}),
            Value::FloatLiteral(x) => json!({"kind": "float-literal", "value": x}),
            Value::Unknown(ty) => json!({"kind": "unknown", "type": ty.as_str()}),
            Value::VariableReference(r) => {
                json!({"kind": "variable-reference", "local": r.to_json()})
            }
            Value::Call(name) => json!({"kind": "call", "callee": name}),
            Value::Compare(lhs, rhs, op) => json!({
                "kind": "compare",
                "lhs": lhs.to_json(),
                "rhs": rhs.to_json(),
                "op": op.as_str(),
            }),
            Value::And(lhs, rhs) => json!({
                "kind": "and",
                "lhs": lhs.to_json(),
                "rhs": rhs.to_json(),
            }),
            Value::Or(lhs, rhs) => json!({
                "kind": "or",
                "lhs": lhs.to_json(),
                "rhs": rhs.to_json(),
            }),
            Value::Negate(inner) => json!({"kind": "negate", "inner": inner.to_json()}),
            Value::ReadParam(name) => json!({"kind": "read-param", "name": name.to_json()}),
            Value::ReadParamWithDefault(name, default) => json!({
                "kind": "read-param-with-default",
                "name": name.to_json(),
                "default": default.to_json(),
            }),
            Value::HasParam(name) => json!({"kind": "has-param", "name": name.to_json()}),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::StringLiteral(s) => write!(f, "{s:?}"),
            Value::IntLiteral(n) => write!(f, "{n}"),
            Value::BoolLiteral(b) => write!(f, "{b}"),
            Value::FloatLiteral(x) => write!(f, "{x}"),
            Value::Unknown(ty) => write!(f, "unknown<{ty}>"),
            Value::VariableReference(r) => write!(f, "{r}"),
            Value::Call(name) => write!(f, "(call {name})"),
            Value::Compare(lhs, rhs, op) => write!(f, "({lhs} {} {rhs})", op.as_str()),
            Value::And(lhs, rhs) => write!(f, "({lhs} && {rhs})"),
            Value::Or(lhs, rhs) => write!(f, "({lhs} || {rhs})"),
            Value::Negate(inner) => write!(f, "!{inner}"),
            Value::ReadParam(name) => write!(f, "read-param({name})"),
            Value::ReadParamWithDefault(name, default) => {
                write!(f, "read-param({name}, default={default})")
            }
            Value::HasParam(name) => write!(f, "has-param({name})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_round_trips_type() {
        let v = Value::unknown(SymbolicType::String);
        assert_eq!(v.to_json(), json!({"kind": "unknown", "type": "string"}));
    }

    #[test]
    fn empty_conjunction_is_trivially_true() {
        assert!(Value::BoolLiteral(true).is_trivially_true());
        assert!(!Value::BoolLiteral(false).is_trivially_true());
    }

    #[test]
    fn negate_wraps_inner() {
        let v = Value::Negate(Box::new(Value::VariableReference(LocalRef::Parameter(0))));
        assert_eq!(
            v.to_json(),
            json!({"kind": "negate", "inner": {"kind": "variable-reference", "local": {"scope": "parameter", "index": 0}}})
        );
    }
}
