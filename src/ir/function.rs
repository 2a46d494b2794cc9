//! Symbolic functions (C1).

use serde_json::{json, Value as Json};

use super::stmt::Statement;
use super::value::SymbolicType;

/// A formal parameter, positionally addressed by [`super::value::LocalRef::Parameter`].
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub index: usize,
    pub name: String,
    pub ty: SymbolicType,
}

/// A local variable, declared or synthesized, addressed by
/// [`super::value::LocalRef::Local`].
///
/// `synthesized` is true for locals the function symbolizer fabricates to
/// give a reading API value somewhere to live (an expression-position
/// `get_param` call that is never let-bound, for instance). Locals are part
/// of the data model (every [`super::value::Value::VariableReference`] must
/// resolve to one, per the IR's invariants) but are not part of the
/// serialized output shape; they exist to make that resolution checkable.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariable {
    pub id: u32,
    pub name: Option<String>,
    pub ty: SymbolicType,
    pub synthesized: bool,
}

/// One function's symbolic summary: its signature and its ordered,
/// guard-annotated statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicFunction {
    pub name: String,
    pub source_location: String,
    pub parameters: Vec<Parameter>,
    pub locals: Vec<LocalVariable>,
    pub body: Vec<Statement>,
    /// True if this function is in the program's relevant set (C7): it
    /// directly contains an API call, or transitively calls one that does.
    /// Driver-internal bookkeeping; not part of the serialized shape.
    pub relevant: bool,
}

impl SymbolicFunction {
    pub fn new(name: impl Into<String>, source_location: impl Into<String>) -> Self {
        SymbolicFunction {
            name: name.into(),
            source_location: source_location.into(),
            parameters: Vec::new(),
            locals: Vec::new(),
            body: Vec::new(),
            relevant: false,
        }
    }

    pub fn declare_local(&mut self, name: Option<String>, ty: SymbolicType, synthesized: bool) -> u32 {
        let id = self.locals.len() as u32;
        self.locals.push(LocalVariable {
            id,
            name,
            ty,
            synthesized,
        });
        id
    }

    pub fn to_json(&self) -> Json {
        json!({
            "name": self.name,
            "source-location": self.source_location,
            "parameters": self.parameters.iter().map(|p| json!({
                "index": p.index,
                "name": p.name,
                "type": p.ty.as_str(),
            })).collect::<Vec<_>>(),
            "body": self.body.iter().map(Statement::to_json).collect::<Vec<_>>(),
        })
    }
}
