//! Function Symbolizer (C5).
//!
//! Performs the single post-order traversal promised by
//! [`crate::ordering`] and [`crate::guard`] over one function body: C2
//! catalog matching, C4 ordering, and C6 guard accumulation all happen
//! inline as the walk descends and backs out of `if`/`match`/`while`
//! blocks, rather than as three separate passes. The walk only *discovers*
//! and orders raw statements (into a `Vec<RawStatement>`); lifting each one
//! into a [`crate::ir::Statement`] via the C3 sub-symbolizers happens in a
//! second pass ([`lift_all`]) once the function's [`crate::scope::Scope`]
//! is fully populated — a `let`-bound reading call earlier in the body
//! must be resolvable by name from a statement lexically after it.
//!
//! A reading API call (`get_param`, `has_param`, ...) that is the direct
//! initializer of a `let` binds to that binding's own local rather than a
//! synthesized one; anywhere else (nested in another expression, or a bare
//! expression statement) it synthesizes a fresh anonymous local, per §4.5
//! step 3.

use std::collections::HashSet;

use syn::spanned::Spanned;
use syn::{Block, Expr, ExprIf, ExprMatch, ExprWhile, Local, Signature};

use crate::catalog::{self, ApiKind};
use crate::diagnostics;
use crate::guard::{BranchSide, GuardStack};
use crate::ir::{LocalRef, Stmt, SymbolicFunction, SymbolicType, Value};
use crate::ordering::{format_location, RawStatement, RawStatementKind};
use crate::scope::{self, Binding, Scope};
use crate::symbolizer::{peel, symbolize_bool, symbolize_expr, symbolize_string, SymbolizerCtx};

/// Read-only context threaded through the traversal: which other
/// functions in the program are eligible inter-procedural-call targets
/// (the *relevant* set, computed by the driver), the enclosing `impl`'s
/// self type (for resolving `self.method()` calls), and the source file
/// path used to format locations.
struct Ctx<'c> {
    relevant_names: &'c HashSet<String>,
    self_type: Option<String>,
    file: String,
}

/// Symbolize one function body, appending its statements to `function`
/// (already declared with its filtered parameter list by the driver's
/// declare-all pass). `sig` seeds the traversal's [`Scope`] with *every*
/// declared parameter, including ones the driver dropped from
/// `function.parameters` — a `NodeHandle` receiver still needs a scope
/// entry so method calls against it can be recognized, and a parameter of
/// any other unsupported (non-primitive) type is likewise tracked so its
/// `Binding::Value(SymbolicType::Unknown)` can be told apart from a
/// supported one: the value symbolizers route both cases through the
/// `Call(name)` fallback instead of `VariableReference`, since a reference
/// to a dropped parameter's index would otherwise dangle (see
/// `symbolizer/expr_sym.rs`).
pub fn symbolize_function<'a>(
    function: &mut SymbolicFunction,
    sig: &'a Signature,
    body: &'a Block,
    relevant_names: &HashSet<String>,
    self_type: Option<String>,
    file: &str,
) {
    let mut scope = Scope::new();
    for (index, arg) in sig.inputs.iter().enumerate() {
        scope.add_parameter(index, arg);
    }
    let mut guard = GuardStack::new();
    let mut raw: Vec<RawStatement<'a>> = Vec::new();
    let ctx = Ctx {
        relevant_names,
        self_type,
        file: file.to_string(),
    };
    walk_block(body, &mut scope, &mut guard, function, &mut raw, &ctx);
    lift_all(function, &scope, raw);
}

fn walk_block<'a, 'c>(
    block: &'a Block,
    scope: &mut Scope,
    guard: &mut GuardStack,
    function: &mut SymbolicFunction,
    raw: &mut Vec<RawStatement<'a>>,
    ctx: &Ctx<'c>,
) {
    for stmt in &block.stmts {
        match stmt {
            syn::Stmt::Local(local) => walk_local(local, scope, guard, function, raw, ctx),
            syn::Stmt::Expr(expr, _) => walk_expr(expr, None, scope, guard, function, raw, ctx),
            syn::Stmt::Macro(_) | syn::Stmt::Item(_) => {}
        }
    }
}

fn walk_local<'a, 'c>(
    local: &'a Local,
    scope: &mut Scope,
    guard: &mut GuardStack,
    function: &mut SymbolicFunction,
    raw: &mut Vec<RawStatement<'a>>,
    ctx: &Ctx<'c>,
) {
    let Some(init) = &local.init else { return };
    let Some((ident, declared_ty)) = scope::simple_ident_binding(&local.pat) else {
        // Non-trivial destructuring pattern: still discover any API calls
        // nested in the initializer, but there is no single name to bind.
        walk_expr(&init.expr, None, scope, guard, function, raw, ctx);
        return;
    };
    let name = ident.to_string();
    let peeled = peel(&init.expr);
    if receiver_permits_api_match(peeled, scope) {
        if let Some(api) = catalog::match_call(peeled) {
            if api.kind.is_reading() {
                walk_expr(api.name_arg, None, scope, guard, function, raw, ctx);
                if let Some(secondary) = api.secondary_arg {
                    walk_expr(secondary, None, scope, guard, function, raw, ctx);
                }
                let conjunction = guard.conjunction();
                let location = format_location(&ctx.file, peeled.span());
                raw.push(RawStatement {
                    kind: RawStatementKind::ApiCall {
                        kind: api.kind,
                        name_arg: api.name_arg,
                        secondary_arg: api.secondary_arg,
                        let_target: Some(name.clone()),
                    },
                    guard: conjunction,
                    source_location: location,
                });
                let id = function.declare_local(Some(name.clone()), SymbolicType::Unknown, false);
                scope.bind_local(&name, LocalRef::Local(id), declared_ty);
                return;
            }
        }
    }
    walk_expr(&init.expr, None, scope, guard, function, raw, ctx);
    let id = function.declare_local(Some(name.clone()), declared_symbolic_type(declared_ty), false);
    scope.bind_local(&name, LocalRef::Local(id), declared_ty);
}

fn declared_symbolic_type(ty: Option<&syn::Type>) -> SymbolicType {
    match ty.map(scope::classify_type) {
        Some(Binding::Value(st)) => st,
        Some(Binding::NodeHandle) => SymbolicType::Unsupported,
        None => SymbolicType::Unknown,
    }
}

/// The single recursive descent implementing C4's post-order traversal:
/// every sub-expression is visited before `expr` itself is checked against
/// the catalog, so a nested API call (§4.5 edge case ii) is always
/// appended ahead of its enclosing call.
fn walk_expr<'a, 'c>(
    expr: &'a Expr,
    let_target: Option<&str>,
    scope: &mut Scope,
    guard: &mut GuardStack,
    function: &mut SymbolicFunction,
    raw: &mut Vec<RawStatement<'a>>,
    ctx: &Ctx<'c>,
) {
    match expr {
        Expr::If(e) => return walk_if(e, scope, guard, function, raw, ctx),
        Expr::Match(e) => return walk_match(e, scope, guard, function, raw, ctx),
        Expr::While(e) => return walk_while(e, scope, guard, function, raw, ctx),
        Expr::Loop(e) => return walk_block(&e.body, scope, guard, function, raw, ctx),
        Expr::ForLoop(e) => {
            walk_expr(&e.expr, None, scope, guard, function, raw, ctx);
            return walk_block(&e.body, scope, guard, function, raw, ctx);
        }
        Expr::Block(e) => return walk_block(&e.block, scope, guard, function, raw, ctx),
        Expr::Paren(e) => return walk_expr(&e.expr, let_target, scope, guard, function, raw, ctx),
        Expr::Group(e) => return walk_expr(&e.expr, let_target, scope, guard, function, raw, ctx),
        Expr::Reference(e) => {
            return walk_expr(&e.expr, let_target, scope, guard, function, raw, ctx)
        }
        Expr::Unary(e) => return walk_expr(&e.expr, None, scope, guard, function, raw, ctx),
        Expr::Cast(e) => return walk_expr(&e.expr, let_target, scope, guard, function, raw, ctx),
        Expr::Try(e) => return walk_expr(&e.expr, let_target, scope, guard, function, raw, ctx),
        Expr::Let(e) => return walk_expr(&e.expr, None, scope, guard, function, raw, ctx),
        Expr::Binary(e) => {
            walk_expr(&e.left, None, scope, guard, function, raw, ctx);
            walk_expr(&e.right, None, scope, guard, function, raw, ctx);
            return;
        }
        Expr::Assign(e) => {
            walk_expr(&e.right, None, scope, guard, function, raw, ctx);
            walk_expr(&e.left, None, scope, guard, function, raw, ctx);
            return;
        }
        Expr::Field(e) => return walk_expr(&e.base, None, scope, guard, function, raw, ctx),
        Expr::Index(e) => {
            walk_expr(&e.expr, None, scope, guard, function, raw, ctx);
            walk_expr(&e.index, None, scope, guard, function, raw, ctx);
            return;
        }
        Expr::Tuple(e) => {
            for el in &e.elems {
                walk_expr(el, None, scope, guard, function, raw, ctx);
            }
            return;
        }
        Expr::Array(e) => {
            for el in &e.elems {
                walk_expr(el, None, scope, guard, function, raw, ctx);
            }
            return;
        }
        Expr::Return(e) => {
            if let Some(inner) = &e.expr {
                walk_expr(inner, None, scope, guard, function, raw, ctx);
            }
            return;
        }
        Expr::MethodCall(call) => {
            walk_expr(&call.receiver, None, scope, guard, function, raw, ctx);
            for arg in &call.args {
                walk_expr(arg, None, scope, guard, function, raw, ctx);
            }
        }
        Expr::Call(call) => {
            walk_expr(&call.func, None, scope, guard, function, raw, ctx);
            for arg in &call.args {
                walk_expr(arg, None, scope, guard, function, raw, ctx);
            }
        }
        // Closures, macros, async/unsafe blocks, and other exotic shapes
        // introduce scopes or control flow this analyzer does not model;
        // they degrade to "no architectural effect found here" rather
        // than aborting (§1 Non-goals, §4.3 "never aborts").
        _ => return,
    }
    check_call_site(expr, let_target, scope, guard, raw, ctx);
}

fn walk_if<'a, 'c>(
    expr_if: &'a ExprIf,
    scope: &mut Scope,
    guard: &mut GuardStack,
    function: &mut SymbolicFunction,
    raw: &mut Vec<RawStatement<'a>>,
    ctx: &Ctx<'c>,
) {
    walk_expr(&expr_if.cond, None, scope, guard, function, raw, ctx);
    let condition = symbolize_bool(&expr_if.cond, &SymbolizerCtx { scope });

    guard.push_branch(condition.clone(), BranchSide::Then);
    walk_block(&expr_if.then_branch, scope, guard, function, raw, ctx);
    guard.pop();

    if let Some((_, else_branch)) = &expr_if.else_branch {
        guard.push_branch(condition, BranchSide::Else);
        match else_branch.as_ref() {
            Expr::Block(b) => walk_block(&b.block, scope, guard, function, raw, ctx),
            Expr::If(nested) => walk_if(nested, scope, guard, function, raw, ctx),
            other => walk_expr(other, None, scope, guard, function, raw, ctx),
        }
        guard.pop();
    }
}

fn walk_while<'a, 'c>(
    expr_while: &'a ExprWhile,
    scope: &mut Scope,
    guard: &mut GuardStack,
    function: &mut SymbolicFunction,
    raw: &mut Vec<RawStatement<'a>>,
    ctx: &Ctx<'c>,
) {
    walk_expr(&expr_while.cond, None, scope, guard, function, raw, ctx);
    let condition = symbolize_bool(&expr_while.cond, &SymbolizerCtx { scope });
    guard.push_predicate(condition);
    walk_block(&expr_while.body, scope, guard, function, raw, ctx);
    guard.pop();
}

/// Match arms conjoin their own pattern guard (`pat if cond => ...`), if
/// present, as an unconditional predicate (§4.6's "switch-case
/// predicates"); the discriminant pattern itself is not modeled as a
/// guard condition (see `DESIGN.md`).
fn walk_match<'a, 'c>(
    expr_match: &'a ExprMatch,
    scope: &mut Scope,
    guard: &mut GuardStack,
    function: &mut SymbolicFunction,
    raw: &mut Vec<RawStatement<'a>>,
    ctx: &Ctx<'c>,
) {
    walk_expr(&expr_match.expr, None, scope, guard, function, raw, ctx);
    for arm in &expr_match.arms {
        if let Some((_, guard_expr)) = &arm.guard {
            walk_expr(guard_expr, None, scope, guard, function, raw, ctx);
            let predicate = symbolize_bool(guard_expr, &SymbolizerCtx { scope });
            guard.push_predicate(predicate);
        }
        walk_expr(&arm.body, None, scope, guard, function, raw, ctx);
        if arm.guard.is_some() {
            guard.pop();
        }
    }
}

/// A method call only matches the catalog when its receiver is known to
/// be a `NodeHandle` or cannot be resolved at all (an unseen/foreign
/// receiver, treated permissively since aliasing is not modeled, §1); a
/// receiver resolved to an ordinary tracked value rejects the match.
fn receiver_permits_api_match(expr: &Expr, scope: &Scope) -> bool {
    let Expr::MethodCall(call) = expr else {
        return true;
    };
    match peel(&call.receiver) {
        Expr::Path(p) => match p.path.get_ident() {
            Some(ident) => match scope.lookup(&ident.to_string()) {
                Some((_, Binding::NodeHandle)) => true,
                Some((_, Binding::Value(_))) => false,
                None => true,
            },
            None => true,
        },
        _ => true,
    }
}

fn check_call_site<'a, 'c>(
    expr: &'a Expr,
    let_target: Option<&str>,
    scope: &Scope,
    guard: &mut GuardStack,
    raw: &mut Vec<RawStatement<'a>>,
    ctx: &Ctx<'c>,
) {
    if receiver_permits_api_match(expr, scope) {
        if let Some(api) = catalog::match_call(expr) {
            let conjunction = guard.conjunction();
            let location = format_location(&ctx.file, expr.span());
            raw.push(RawStatement {
                kind: RawStatementKind::ApiCall {
                    kind: api.kind,
                    name_arg: api.name_arg,
                    secondary_arg: api.secondary_arg,
                    let_target: let_target.map(str::to_string),
                },
                guard: conjunction,
                source_location: location,
            });
            return;
        }
    }
    check_inter_proc(expr, guard, raw, ctx);
}

/// Resolve `expr` as a call to another *relevant* function (§4.5 step 3):
/// a free call through a simple path, or a `self.method()` call inside an
/// `impl` block. A call through any other shape (a stored closure, a
/// trait-object method, a computed callee) is an indirect callee and is
/// reported and skipped per §4.5 edge case (i); an ordinary method call on
/// a value that is not `self` is not an inter-procedural call candidate at
/// all and is silently ignored, since it has no architectural effect.
fn check_inter_proc<'a, 'c>(
    expr: &'a Expr,
    guard: &mut GuardStack,
    raw: &mut Vec<RawStatement<'a>>,
    ctx: &Ctx<'c>,
) {
    match expr {
        Expr::Call(call) => match call.func.as_ref() {
            Expr::Path(p) => {
                if let Some(name) = p.path.segments.last().map(|s| s.ident.to_string()) {
                    if ctx.relevant_names.contains(&name) {
                        emit_inter_proc(expr, name, call.args.iter().collect(), guard, raw, ctx);
                    }
                }
            }
            _ => diagnostics::recoverable(
                "function_symbolizer",
                "indirect call through a non-path callee",
            ),
        },
        Expr::MethodCall(call) => {
            let is_self = matches!(peel(&call.receiver), Expr::Path(p) if p.path.is_ident("self"));
            if is_self {
                if let Some(self_ty) = &ctx.self_type {
                    let name = format!("{self_ty}::{}", call.method);
                    if ctx.relevant_names.contains(&name) {
                        emit_inter_proc(expr, name, call.args.iter().collect(), guard, raw, ctx);
                    }
                }
            }
        }
        _ => {}
    }
}

fn emit_inter_proc<'a, 'c>(
    expr: &'a Expr,
    callee: String,
    arguments: Vec<&'a Expr>,
    guard: &mut GuardStack,
    raw: &mut Vec<RawStatement<'a>>,
    ctx: &Ctx<'c>,
) {
    let conjunction = guard.conjunction();
    let location = format_location(&ctx.file, expr.span());
    raw.push(RawStatement {
        kind: RawStatementKind::InterProcCall { callee, arguments },
        guard: conjunction,
        source_location: location,
    });
}

fn lift_all(function: &mut SymbolicFunction, scope: &Scope, raw: Vec<RawStatement>) {
    for item in raw {
        if let Some(statement) = lift_one(function, scope, item) {
            function.body.push(statement);
        }
    }
}

fn lift_one(
    function: &mut SymbolicFunction,
    scope: &Scope,
    raw: RawStatement,
) -> Option<crate::ir::Statement> {
    let ctx = SymbolizerCtx { scope };
    match raw.kind {
        RawStatementKind::ApiCall {
            kind,
            name_arg,
            secondary_arg,
            let_target,
        } => {
            if kind.is_reading() {
                let target = match let_target.as_deref().and_then(|name| scope.lookup(name)) {
                    Some((local_ref, _)) => local_ref,
                    None => LocalRef::Local(function.declare_local(None, SymbolicType::Unknown, true)),
                };
                let value = lift_reading_value(kind, name_arg, secondary_arg, &ctx);
                Some(crate::ir::Statement::new(
                    Stmt::Assignment {
                        target,
                        value,
                    },
                    raw.guard,
                    raw.source_location,
                ))
            } else {
                let stmt = lift_side_effecting(kind, name_arg, secondary_arg, &ctx);
                Some(crate::ir::Statement::new(stmt, raw.guard, raw.source_location))
            }
        }
        RawStatementKind::InterProcCall { callee, arguments } => {
            let arguments = arguments
                .iter()
                .map(|arg| symbolize_expr(arg, &ctx))
                .collect();
            Some(crate::ir::Statement::new(
                Stmt::Call { callee, arguments },
                raw.guard,
                raw.source_location,
            ))
        }
    }
}

fn lift_reading_value(
    kind: ApiKind,
    name_arg: &Expr,
    secondary_arg: Option<&Expr>,
    ctx: &SymbolizerCtx,
) -> Value {
    let name = symbolize_string(name_arg, ctx);
    match kind {
        ApiKind::ReadParam | ApiKind::ReadParamCached => Value::ReadParam(Box::new(name)),
        ApiKind::ReadParamWithDefault => {
            let default = secondary_arg
                .map(|e| symbolize_expr(e, ctx))
                .unwrap_or_else(|| Value::unknown(SymbolicType::Unknown));
            Value::ReadParamWithDefault(Box::new(name), Box::new(default))
        }
        ApiKind::HasParam => Value::HasParam(Box::new(name)),
        _ => unreachable!("lift_reading_value called with a non-reading ApiKind"),
    }
}

fn lift_side_effecting(
    kind: ApiKind,
    name_arg: &Expr,
    secondary_arg: Option<&Expr>,
    ctx: &SymbolizerCtx,
) -> Stmt {
    let name = symbolize_string(name_arg, ctx);
    match kind {
        ApiKind::RosInit => Stmt::RosInit { name },
        ApiKind::Publisher => Stmt::Publisher { topic: name },
        ApiKind::Subscriber => Stmt::Subscriber { topic: name },
        ApiKind::ServiceProvider => Stmt::ServiceProvider { name },
        ApiKind::ServiceCaller => Stmt::ServiceCaller { name },
        ApiKind::DeleteParam => Stmt::DeleteParam { name },
        ApiKind::WriteParam => {
            let value = secondary_arg
                .map(|e| symbolize_expr(e, ctx))
                .unwrap_or_else(|| Value::unknown(SymbolicType::Unknown));
            Stmt::WriteParam { name, value }
        }
        ApiKind::ReadParam | ApiKind::ReadParamCached | ApiKind::ReadParamWithDefault | ApiKind::HasParam => {
            unreachable!("lift_side_effecting called with a reading ApiKind")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn symbolize(item: syn::ItemFn, relevant: &HashSet<String>) -> SymbolicFunction {
        let name = item.sig.ident.to_string();
        let mut function = SymbolicFunction::new(&name, "talker.rs:1:1");
        symbolize_function(
            &mut function,
            &item.sig,
            &item.block,
            relevant,
            None,
            "talker.rs",
        );
        function
    }

    #[test]
    fn unconditional_publisher() {
        let item: syn::ItemFn = parse_quote! {
            fn setup(node: &NodeHandle) {
                node.advertise("chatter", 10);
            }
        };
        let function = symbolize(item, &HashSet::new());
        assert_eq!(function.body.len(), 1);
        assert_eq!(
            function.body[0].stmt,
            Stmt::Publisher {
                topic: Value::StringLiteral("chatter".into())
            }
        );
        assert!(function.body[0].guard.is_none());
    }

    #[test]
    fn conditional_subscriber_guards_on_variable() {
        let item: syn::ItemFn = parse_quote! {
            fn setup(node: &NodeHandle, use_sensor: bool) {
                if use_sensor {
                    node.subscribe("scan", 10);
                }
            }
        };
        let function = symbolize(item, &HashSet::new());
        assert_eq!(function.body.len(), 1);
        assert_eq!(
            function.body[0].stmt,
            Stmt::Subscriber {
                topic: Value::StringLiteral("scan".into())
            }
        );
        assert_eq!(
            function.body[0].guard,
            Some(Value::VariableReference(LocalRef::Parameter(1)))
        );
    }

    #[test]
    fn negated_guard_for_else_style_condition() {
        let item: syn::ItemFn = parse_quote! {
            fn teardown(node: &NodeHandle, enabled: bool) {
                if !enabled {
                    node.delete_param("p");
                }
            }
        };
        let function = symbolize(item, &HashSet::new());
        assert_eq!(
            function.body[0].guard,
            Some(Value::Negate(Box::new(Value::VariableReference(LocalRef::Parameter(1)))))
        );
    }

    #[test]
    fn read_param_with_default_binds_let_target() {
        let item: syn::ItemFn = parse_quote! {
            fn setup(node: &NodeHandle) {
                let rate = node.get_param_with_default("rate", 10.0);
            }
        };
        let function = symbolize(item, &HashSet::new());
        assert_eq!(function.body.len(), 1);
        match &function.body[0].stmt {
            Stmt::Assignment { target, value } => {
                assert_eq!(*target, LocalRef::Local(0));
                assert_eq!(
                    *value,
                    Value::ReadParamWithDefault(
                        Box::new(Value::StringLiteral("rate".into())),
                        Box::new(Value::FloatLiteral(10.0)),
                    )
                );
            }
            other => panic!("expected assignment, got {other:?}"),
        }
        assert!(function.body[0].guard.is_none());
    }

    #[test]
    fn get_param_with_unknown_name_yields_unknown() {
        let item: syn::ItemFn = parse_quote! {
            fn setup(node: &NodeHandle, topic_name: String) {
                node.get_param(topic_name);
            }
        };
        let function = symbolize(item, &HashSet::new());
        match &function.body[0].stmt {
            Stmt::Assignment { value, .. } => {
                assert_eq!(*value, Value::ReadParam(Box::new(Value::unknown(SymbolicType::String))));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn inter_procedural_call_resolves_against_relevant_set() {
        let item: syn::ItemFn = parse_quote! {
            fn a() {
                b();
            }
        };
        let mut relevant = HashSet::new();
        relevant.insert("b".to_string());
        let function = symbolize(item, &relevant);
        assert_eq!(function.body.len(), 1);
        assert_eq!(
            function.body[0].stmt,
            Stmt::Call {
                callee: "b".to_string(),
                arguments: vec![],
            }
        );
    }

    #[test]
    fn call_to_non_relevant_function_contributes_no_statement() {
        let item: syn::ItemFn = parse_quote! {
            fn a() {
                println_like_helper();
            }
        };
        let function = symbolize(item, &HashSet::new());
        assert!(function.body.is_empty());
    }

    #[test]
    fn non_node_handle_receiver_does_not_match_catalog() {
        let item: syn::ItemFn = parse_quote! {
            fn setup(counter: &mut Counter) {
                counter.advertise("not-a-topic");
            }
        };
        let function = symbolize(item, &HashSet::new());
        assert!(function.body.is_empty());
    }
}
