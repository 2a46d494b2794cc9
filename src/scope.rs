//! Per-function scope: the set of known parameters and locals, their
//! symbolic types, and which ones are bound to a `NodeHandle`.
//!
//! Built incrementally by the function symbolizer's single traversal
//! (`function_symbolizer.rs`): parameters are registered up front from the
//! signature, and each `let` binding is registered the moment its statement
//! is visited — before walking into the *next* statement, but only after
//! its own initializer has already been walked, since a binding cannot
//! refer to itself. Local id allocation lives on
//! [`crate::ir::SymbolicFunction`] (the owner of the `locals` table), not
//! here; this type only tracks the name→reference/type mapping used to
//! resolve later `Path` expressions.

use std::collections::HashMap;

use syn::{FnArg, Pat, Type};

use crate::ir::{LocalRef, SymbolicType};

/// What a tracked name in scope is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// A `NodeHandle` (or `&NodeHandle`/`&mut NodeHandle`) value — method
    /// calls on a variable with this binding are eligible for catalog
    /// matching.
    NodeHandle,
    /// An ordinary value of the given symbolic type. `SymbolicType::Unknown`
    /// covers both an unannotated local and a parameter of an unsupported
    /// (non-primitive) type — the latter is dropped from the function's
    /// serialized `parameters` list (see `driver::declared_parameters`), so
    /// the value symbolizers never turn this binding into a
    /// `VariableReference`, only `Call(name)`.
    Value(SymbolicType),
}

/// The environment built for one function body.
#[derive(Debug, Default)]
pub struct Scope {
    names: HashMap<String, (LocalRef, Binding)>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Register a function parameter, in declaration order. Returns the
    /// binding computed for it so the caller can decide whether to keep it
    /// as a [`crate::ir::ir::Parameter`] (parameters whose type does not map
    /// to a supported symbolic type are dropped per §4.7).
    pub fn add_parameter(&mut self, index: usize, arg: &FnArg) -> Option<Binding> {
        let FnArg::Typed(pat_type) = arg else {
            return None;
        };
        let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
            return None;
        };
        let binding = classify_type(&pat_type.ty);
        self.names.insert(
            pat_ident.ident.to_string(),
            (LocalRef::Parameter(index), binding),
        );
        Some(binding)
    }

    /// Register a named local binding (already assigned `reference` by the
    /// caller) with the given declared type. Returns the [`Binding`]
    /// computed from `ty`, so the caller can decide what `SymbolicType` to
    /// record for it.
    pub fn bind_local(&mut self, name: &str, reference: LocalRef, ty: Option<&Type>) -> Binding {
        let binding = ty.map(classify_type).unwrap_or(Binding::Value(SymbolicType::Unknown));
        self.names.insert(name.to_string(), (reference, binding));
        binding
    }

    pub fn lookup(&self, name: &str) -> Option<(LocalRef, Binding)> {
        self.names.get(name).copied()
    }

    pub fn is_node_handle(&self, name: &str) -> bool {
        matches!(self.lookup(name), Some((_, Binding::NodeHandle)))
    }
}

/// Extract a `let` binding's simple identifier pattern and declared type
/// annotation, if it has both. `let (a, b) = ...` and other non-trivial
/// patterns are not tracked (a documented limitation: see `DESIGN.md`).
pub fn simple_ident_binding(pat: &Pat) -> Option<(&syn::Ident, Option<&Type>)> {
    match pat {
        Pat::Ident(ident) => Some((&ident.ident, None)),
        Pat::Type(pat_type) => match pat_type.pat.as_ref() {
            Pat::Ident(ident) => Some((&ident.ident, Some(pat_type.ty.as_ref()))),
            _ => None,
        },
        _ => None,
    }
}

fn peel_refs(mut ty: &Type) -> &Type {
    while let Type::Reference(r) = ty {
        ty = r.elem.as_ref();
    }
    ty
}

fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(p) => p.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

pub fn classify_type(ty: &Type) -> Binding {
    let ty = peel_refs(ty);
    if type_name(ty).as_deref() == Some("NodeHandle") {
        return Binding::NodeHandle;
    }
    Binding::Value(symbolic_type_of(ty))
}

fn symbolic_type_of(ty: &Type) -> SymbolicType {
    match type_name(ty).as_deref() {
        Some("String") | Some("str") => SymbolicType::String,
        Some("bool") => SymbolicType::Bool,
        Some(
            "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
            | "u128" | "usize",
        ) => SymbolicType::Integer,
        Some("f32") | Some("f64") => SymbolicType::Float,
        _ => SymbolicType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn node_handle_parameter_is_tracked() {
        let arg: FnArg = parse_quote!(node: &NodeHandle);
        let mut scope = Scope::new();
        scope.add_parameter(0, &arg);
        assert!(scope.is_node_handle("node"));
    }

    #[test]
    fn string_parameter_has_string_type() {
        let arg: FnArg = parse_quote!(topic: String);
        let mut scope = Scope::new();
        scope.add_parameter(0, &arg);
        let (reference, binding) = scope.lookup("topic").unwrap();
        assert_eq!(reference, LocalRef::Parameter(0));
        assert_eq!(binding, Binding::Value(SymbolicType::String));
    }

    #[test]
    fn bind_local_resolves_declared_type() {
        let local: syn::Local = parse_quote!(let rate: f64 = 10.0;);
        let (ident, ty) = simple_ident_binding(&local.pat).unwrap();
        let mut scope = Scope::new();
        let binding = scope.bind_local(&ident.to_string(), LocalRef::Local(0), ty);
        assert_eq!(binding, Binding::Value(SymbolicType::Float));
    }
}
