//! Call-Graph Driver / Program Symbolizer (C7).
//!
//! Drives the whole pipeline over one translation unit at a time (§5: no
//! ordering is guaranteed *between* translation units, only within one):
//! discover every declared function, find which ones directly contain an
//! API call site (`containing`), build the direct-call edges between
//! declared functions, expand `containing` to the *relevant* set by
//! reverse reachability, then run the declare-all/symbolize-all two-pass
//! sequence from §4.7 step 5 before folding the result into the whole-
//! program [`SymbolicProgram`] with first-seen-wins on duplicate qualified
//! names.

use std::collections::{HashMap, HashSet};
use std::fs;

use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use syn::{Expr, ImplItem, Item, Signature};

use crate::catalog;
use crate::compdb::TranslationUnit;
use crate::diagnostics;
use crate::error::NodescopeError;
use crate::ir::{LocalRef, Parameter, Stmt, SymbolicFunction, SymbolicProgram, Value};
use crate::ordering::format_location;
use crate::scope::{self, Binding};
use crate::symbolizer::peel;

/// One function declaration discovered in a translation unit, before any
/// relevance filtering.
struct DeclaredFn<'a> {
    name: String,
    self_type: Option<String>,
    sig: &'a Signature,
    body: &'a syn::Block,
    source_location: String,
}

/// Parse and symbolize every translation unit in `units`, folding the
/// result into a single [`SymbolicProgram`]. A parse failure is fatal
/// (§7): the whole-program driver does not have a partial-file
/// fallback, since an unparseable translation unit means its call graph
/// cannot be built at all.
pub fn build_program(units: &[TranslationUnit]) -> Result<SymbolicProgram, NodescopeError> {
    let mut program = SymbolicProgram::new();
    for unit in units {
        if !unit.file.exists() {
            return Err(NodescopeError::SourceNotFound {
                path: unit.file.to_string_lossy().into_owned(),
            });
        }
        let source = fs::read_to_string(&unit.file)?;
        let file = unit.file.to_string_lossy().into_owned();
        let ast = syn::parse_file(&source).map_err(|e| NodescopeError::ParseFailed {
            path: file.clone(),
            reason: e.to_string(),
        })?;
        process_translation_unit(&mut program, &ast, &file);
    }
    validate_program(&program)?;
    Ok(program)
}

/// Validate the IR invariants listed in §3 before the program reaches the
/// serializer: every `Stmt::Call`'s callee resolves in the program's
/// function map (invariant 1), and every `Value::VariableReference`
/// resolves to a parameter or local declared in its enclosing function
/// (invariant 2). A violation here is a bug in the symbolizer itself, not a
/// property of the analyzed source (§7: "invariant violation within the
/// IR"), and is always fatal.
fn validate_program(program: &SymbolicProgram) -> Result<(), NodescopeError> {
    for function in program.functions.values() {
        for statement in &function.body {
            if let Stmt::Call { callee, .. } = &statement.stmt {
                if !program.functions.contains_key(callee) {
                    return Err(NodescopeError::InvariantViolation {
                        reason: format!(
                            "function '{}' calls unresolved callee '{callee}'",
                            function.name
                        ),
                    });
                }
            }
            if let Some(guard) = &statement.guard {
                validate_value(guard, function)?;
            }
            validate_stmt_values(&statement.stmt, function)?;
        }
    }
    Ok(())
}

fn validate_stmt_values(stmt: &Stmt, function: &SymbolicFunction) -> Result<(), NodescopeError> {
    match stmt {
        Stmt::Publisher { topic } | Stmt::Subscriber { topic } => validate_value(topic, function),
        Stmt::ServiceProvider { name }
        | Stmt::ServiceCaller { name }
        | Stmt::DeleteParam { name }
        | Stmt::RosInit { name } => validate_value(name, function),
        Stmt::WriteParam { name, value } => {
            validate_value(name, function)?;
            validate_value(value, function)
        }
        Stmt::Assignment { target, value } => {
            validate_local_ref(*target, function)?;
            validate_value(value, function)
        }
        Stmt::Call { arguments, .. } => {
            for arg in arguments {
                validate_value(arg, function)?;
            }
            Ok(())
        }
    }
}

/// Recurse into every nested `Value`, checking each `VariableReference`
/// found along the way (§3 invariant 2) against `function`'s declared
/// parameters and locals.
fn validate_value(value: &Value, function: &SymbolicFunction) -> Result<(), NodescopeError> {
    match value {
        Value::VariableReference(local_ref) => validate_local_ref(*local_ref, function),
        Value::Compare(lhs, rhs, _) | Value::And(lhs, rhs) | Value::Or(lhs, rhs) => {
            validate_value(lhs, function)?;
            validate_value(rhs, function)
        }
        Value::Negate(inner) => validate_value(inner, function),
        Value::ReadParam(name) | Value::HasParam(name) => validate_value(name, function),
        Value::ReadParamWithDefault(name, default) => {
            validate_value(name, function)?;
            validate_value(default, function)
        }
        Value::StringLiteral(_)
        | Value::IntLiteral(_)
        | Value::BoolLiteral(_)
        | Value::FloatLiteral(_)
        | Value::Unknown(_)
        | Value::Call(_) => Ok(()),
    }
}

fn validate_local_ref(local_ref: LocalRef, function: &SymbolicFunction) -> Result<(), NodescopeError> {
    let resolves = match local_ref {
        LocalRef::Parameter(index) => function.parameters.iter().any(|p| p.index == index),
        LocalRef::Local(id) => (id as usize) < function.locals.len(),
    };
    if resolves {
        Ok(())
    } else {
        Err(NodescopeError::InvariantViolation {
            reason: format!(
                "function '{}' has a variable reference to unresolved {local_ref} ({local_ref:?})",
                function.name
            ),
        })
    }
}

fn process_translation_unit(program: &mut SymbolicProgram, ast: &syn::File, file: &str) {
    let declared = collect_declared_fns(ast, file);
    let declared_names: HashSet<String> = declared.iter().map(|f| f.name.clone()).collect();

    let mut containing: HashSet<String> = HashSet::new();
    let mut call_edges: HashMap<String, HashSet<String>> = HashMap::new();
    for decl in &declared {
        let scan = scan_function(decl, &declared_names);
        if scan.has_api_call {
            containing.insert(decl.name.clone());
        }
        call_edges.insert(decl.name.clone(), scan.callees);
    }

    let relevant = expand_relevant(&containing, &call_edges);
    if relevant.is_empty() {
        return;
    }

    let mut functions: HashMap<String, SymbolicFunction> = HashMap::new();
    for decl in &declared {
        if !relevant.contains(&decl.name) {
            continue;
        }
        let mut function = SymbolicFunction::new(decl.name.clone(), decl.source_location.clone());
        function.parameters = declared_parameters(decl.sig);
        function.relevant = true;
        functions.insert(decl.name.clone(), function);
    }

    for decl in &declared {
        let Some(mut function) = functions.remove(&decl.name) else {
            continue;
        };
        crate::function_symbolizer::symbolize_function(
            &mut function,
            decl.sig,
            decl.body,
            &relevant,
            decl.self_type.clone(),
            file,
        );
        functions.insert(decl.name.clone(), function);
    }

    for (name, function) in functions {
        if program.functions.contains_key(&name) {
            diagnostics::notice(&format!(
                "duplicate qualified name '{name}' across translation units; keeping first-seen definition"
            ));
            continue;
        }
        program.insert(function);
    }
}

/// Build the positional, type-filtered parameter list for a function's
/// serialized shape (§4.7 step 4): a parameter is dropped, not recorded
/// with `Unknown`/`Unsupported`, when its declared type does not map to
/// one of the four supported symbolic types.
fn declared_parameters(sig: &Signature) -> Vec<Parameter> {
    let mut scope = scope::Scope::new();
    let mut parameters = Vec::new();
    for (index, arg) in sig.inputs.iter().enumerate() {
        if let Some(Binding::Value(ty)) = scope.add_parameter(index, arg) {
            if !matches!(ty, crate::ir::SymbolicType::Unknown) {
                let name = parameter_name(arg).unwrap_or_else(|| format!("arg{index}"));
                parameters.push(Parameter { index, name, ty });
            }
        }
    }
    parameters
}

fn parameter_name(arg: &syn::FnArg) -> Option<String> {
    let syn::FnArg::Typed(pat_type) = arg else {
        return None;
    };
    match pat_type.pat.as_ref() {
        syn::Pat::Ident(ident) => Some(ident.ident.to_string()),
        _ => None,
    }
}

fn collect_declared_fns<'a>(ast: &'a syn::File, file: &str) -> Vec<DeclaredFn<'a>> {
    let mut out = Vec::new();
    for item in &ast.items {
        match item {
            Item::Fn(item_fn) => {
                out.push(DeclaredFn {
                    name: item_fn.sig.ident.to_string(),
                    self_type: None,
                    sig: &item_fn.sig,
                    body: &item_fn.block,
                    source_location: format_location(file, item_fn.sig.ident.span()),
                });
            }
            Item::Impl(item_impl) => {
                let Some(self_type) = self_type_name(&item_impl.self_ty) else {
                    continue;
                };
                for impl_item in &item_impl.items {
                    if let ImplItem::Fn(method) = impl_item {
                        out.push(DeclaredFn {
                            name: format!("{self_type}::{}", method.sig.ident),
                            self_type: Some(self_type.clone()),
                            sig: &method.sig,
                            body: &method.block,
                            source_location: format_location(file, method.sig.ident.span()),
                        });
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn self_type_name(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(p) => p.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

struct Scan {
    has_api_call: bool,
    callees: HashSet<String>,
}

/// A lightweight recursive scan used only to decide `containing` set
/// membership and build call-graph edges (§4.7 steps 2-3); unlike
/// [`crate::function_symbolizer`]'s traversal it tracks neither scope nor
/// guards, since presence/absence and name-level reachability are all the
/// driver needs before the real symbolization pass runs.
fn scan_function(decl: &DeclaredFn, declared_names: &HashSet<String>) -> Scan {
    let mut scan = Scan {
        has_api_call: false,
        callees: HashSet::new(),
    };
    scan_block(&decl.body, decl.self_type.as_deref(), declared_names, &mut scan);
    scan
}

fn scan_block(block: &syn::Block, self_type: Option<&str>, declared: &HashSet<String>, scan: &mut Scan) {
    for stmt in &block.stmts {
        match stmt {
            syn::Stmt::Local(local) => {
                if let Some(init) = &local.init {
                    scan_expr(&init.expr, self_type, declared, scan);
                }
            }
            syn::Stmt::Expr(expr, _) => scan_expr(expr, self_type, declared, scan),
            syn::Stmt::Macro(_) | syn::Stmt::Item(_) => {}
        }
    }
}

fn scan_expr(expr: &Expr, self_type: Option<&str>, declared: &HashSet<String>, scan: &mut Scan) {
    match expr {
        Expr::If(e) => {
            scan_expr(&e.cond, self_type, declared, scan);
            scan_block(&e.then_branch, self_type, declared, scan);
            if let Some((_, else_branch)) = &e.else_branch {
                scan_expr(else_branch, self_type, declared, scan);
            }
        }
        Expr::Match(e) => {
            scan_expr(&e.expr, self_type, declared, scan);
            for arm in &e.arms {
                if let Some((_, guard)) = &arm.guard {
                    scan_expr(guard, self_type, declared, scan);
                }
                scan_expr(&arm.body, self_type, declared, scan);
            }
        }
        Expr::While(e) => {
            scan_expr(&e.cond, self_type, declared, scan);
            scan_block(&e.body, self_type, declared, scan);
        }
        Expr::Loop(e) => scan_block(&e.body, self_type, declared, scan),
        Expr::ForLoop(e) => {
            scan_expr(&e.expr, self_type, declared, scan);
            scan_block(&e.body, self_type, declared, scan);
        }
        Expr::Block(e) => scan_block(&e.block, self_type, declared, scan),
        Expr::Paren(e) => scan_expr(&e.expr, self_type, declared, scan),
        Expr::Group(e) => scan_expr(&e.expr, self_type, declared, scan),
        Expr::Reference(e) => scan_expr(&e.expr, self_type, declared, scan),
        Expr::Unary(e) => scan_expr(&e.expr, self_type, declared, scan),
        Expr::Cast(e) => scan_expr(&e.expr, self_type, declared, scan),
        Expr::Try(e) => scan_expr(&e.expr, self_type, declared, scan),
        Expr::Let(e) => scan_expr(&e.expr, self_type, declared, scan),
        Expr::Binary(e) => {
            scan_expr(&e.left, self_type, declared, scan);
            scan_expr(&e.right, self_type, declared, scan);
        }
        Expr::Assign(e) => {
            scan_expr(&e.left, self_type, declared, scan);
            scan_expr(&e.right, self_type, declared, scan);
        }
        Expr::Field(e) => scan_expr(&e.base, self_type, declared, scan),
        Expr::Index(e) => {
            scan_expr(&e.expr, self_type, declared, scan);
            scan_expr(&e.index, self_type, declared, scan);
        }
        Expr::Tuple(e) => {
            for el in &e.elems {
                scan_expr(el, self_type, declared, scan);
            }
        }
        Expr::Array(e) => {
            for el in &e.elems {
                scan_expr(el, self_type, declared, scan);
            }
        }
        Expr::Return(e) => {
            if let Some(inner) = &e.expr {
                scan_expr(inner, self_type, declared, scan);
            }
        }
        Expr::MethodCall(call) => {
            scan_expr(&call.receiver, self_type, declared, scan);
            for arg in &call.args {
                scan_expr(arg, self_type, declared, scan);
            }
            if catalog::match_call(expr).is_some() {
                scan.has_api_call = true;
            } else {
                let is_self = matches!(peel(&call.receiver), Expr::Path(p) if p.path.is_ident("self"));
                if is_self {
                    if let Some(ty) = self_type {
                        let name = format!("{ty}::{}", call.method);
                        if declared.contains(&name) {
                            scan.callees.insert(name);
                        }
                    }
                }
            }
        }
        Expr::Call(call) => {
            scan_expr(&call.func, self_type, declared, scan);
            for arg in &call.args {
                scan_expr(arg, self_type, declared, scan);
            }
            if catalog::match_call(expr).is_some() {
                scan.has_api_call = true;
            } else if let Expr::Path(p) = call.func.as_ref() {
                if let Some(name) = p.path.segments.last().map(|s| s.ident.to_string()) {
                    if declared.contains(&name) {
                        scan.callees.insert(name);
                    }
                }
            }
        }
        _ => {}
    }
}

/// Reverse-reachability over the call graph (§4.7 step 3): a function is
/// relevant if it directly contains an API call, or it can reach one
/// transitively through calls it makes. Built as a `petgraph` digraph with
/// edges pointing from callee to caller (the reverse of the call
/// direction), so a depth-first walk starting at each `containing` node
/// visits exactly the set of functions that call their way into it.
fn expand_relevant(
    containing: &HashSet<String>,
    call_edges: &HashMap<String, HashSet<String>>,
) -> HashSet<String> {
    let mut graph = DiGraphMap::<&str, ()>::new();
    for caller in call_edges.keys() {
        graph.add_node(caller.as_str());
    }
    for (caller, callees) in call_edges {
        for callee in callees {
            graph.add_node(callee.as_str());
            graph.add_edge(callee.as_str(), caller.as_str(), ());
        }
    }

    let mut relevant: HashSet<String> = HashSet::new();
    for start in containing {
        if !graph.contains_node(start.as_str()) {
            relevant.insert(start.clone());
            continue;
        }
        let mut dfs = Dfs::new(&graph, start.as_str());
        while let Some(node) = dfs.next(&graph) {
            relevant.insert(node.to_string());
        }
    }
    relevant
}
