//! API Call Catalog (C2).
//!
//! Pattern-matches a single AST expression against the closed set of
//! recognized robotics-API call shapes and, on a match, exposes a uniform
//! accessor for the resource-naming argument (and, where relevant, the
//! default/written-value argument). The catalog is stateless: it answers
//! "does this expression match, and if so how" for one expression at a
//! time; the function symbolizer's traversal ([`crate::function_symbolizer`])
//! calls it once per visited call expression rather than running a
//! separate full-tree scan, since the post-order walk already visits every
//! node exactly once.
//!
//! Node-handle-scoped forms are ordinary method calls (`node.advertise(...)`);
//! free-function forms live under a `ros::` path (`ros::get_param(...)`).
//! Both resolve to the same [`ApiKind`] — the catalog does not care which
//! receiver a call was written against, only its name and shape.

use syn::{Expr, ExprCall, ExprMethodCall};

/// The closed enumeration of recognized robotics-API call kinds (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    RosInit,
    Publisher,
    Subscriber,
    ServiceProvider,
    ServiceCaller,
    ReadParam,
    ReadParamCached,
    ReadParamWithDefault,
    HasParam,
    WriteParam,
    DeleteParam,
}

/// A matched call site, borrowing its argument expressions from the AST
/// the caller owns for the duration of one function's symbolization.
pub struct RawApiCall<'ast> {
    pub kind: ApiKind,
    pub site: &'ast Expr,
    /// The expression supplying the topic/service/parameter name.
    pub name_arg: &'ast Expr,
    /// The default value ([`ApiKind::ReadParamWithDefault`]) or written
    /// value ([`ApiKind::WriteParam`]), when the kind carries one.
    pub secondary_arg: Option<&'ast Expr>,
}

const METHOD_TABLE: &[(&str, ApiKind)] = &[
    ("advertise", ApiKind::Publisher),
    ("subscribe", ApiKind::Subscriber),
    ("advertise_service", ApiKind::ServiceProvider),
    ("service_client", ApiKind::ServiceCaller),
    ("get_param", ApiKind::ReadParam),
    ("get_param_cached", ApiKind::ReadParamCached),
    ("get_param_with_default", ApiKind::ReadParamWithDefault),
    ("has_param", ApiKind::HasParam),
    ("set_param", ApiKind::WriteParam),
    ("delete_param", ApiKind::DeleteParam),
];

const FREE_FUNCTION_TABLE: &[(&str, ApiKind)] = &[
    ("init", ApiKind::RosInit),
    ("service_call", ApiKind::ServiceCaller),
    ("get_param", ApiKind::ReadParam),
    ("get_param_cached", ApiKind::ReadParamCached),
    ("get_param_with_default", ApiKind::ReadParamWithDefault),
    ("has_param", ApiKind::HasParam),
    ("set_param", ApiKind::WriteParam),
    ("delete_param", ApiKind::DeleteParam),
];

fn secondary_arg_count(kind: ApiKind) -> usize {
    match kind {
        ApiKind::ReadParamWithDefault | ApiKind::WriteParam => 1,
        _ => 0,
    }
}

/// Match a method call (`receiver.method(args...)`) against the catalog.
fn match_method_call(call: &ExprMethodCall) -> Option<(ApiKind, &Expr, Option<&Expr>)> {
    let ident = call.method.to_string();
    let kind = METHOD_TABLE
        .iter()
        .find(|(name, _)| *name == ident)
        .map(|(_, kind)| *kind)?;
    let name_arg = call.args.first()?;
    let secondary_arg = if secondary_arg_count(kind) == 1 {
        call.args.iter().nth(1)
    } else {
        None
    };
    Some((kind, name_arg, secondary_arg))
}

/// Match a free function call (`ros::init(args...)` or a bare, unqualified
/// `service_call(args...)`) against the catalog.
fn match_free_call(call: &ExprCall) -> Option<(ApiKind, &Expr, Option<&Expr>)> {
    let Expr::Path(path) = call.func.as_ref() else {
        return None;
    };
    let last = path.path.segments.last()?;
    let ident = last.ident.to_string();
    let kind = FREE_FUNCTION_TABLE
        .iter()
        .find(|(name, _)| *name == ident)
        .map(|(_, kind)| *kind)?;
    let name_arg = call.args.first()?;
    let secondary_arg = if secondary_arg_count(kind) == 1 {
        call.args.iter().nth(1)
    } else {
        None
    };
    Some((kind, name_arg, secondary_arg))
}

/// Attempt to match `expr` itself as a recognized API call site. Returns
/// `None` for any other expression shape, including an ordinary
/// inter-procedural call, which the driver matches separately against the
/// program's function table.
pub fn match_call(expr: &Expr) -> Option<RawApiCall<'_>> {
    let (kind, name_arg, secondary_arg) = match expr {
        Expr::MethodCall(call) => match_method_call(call)?,
        Expr::Call(call) => match_free_call(call)?,
        _ => return None,
    };
    Some(RawApiCall {
        kind,
        site: expr,
        name_arg,
        secondary_arg,
    })
}

impl ApiKind {
    /// The JSON `kind` tag this API kind lowers to when it is a
    /// side-effecting statement (see `DESIGN.md` for why the reading kinds
    /// are excluded: they lower to [`crate::ir::Value`] variants instead).
    pub const fn stmt_kind_str(self) -> Option<&'static str> {
        match self {
            ApiKind::RosInit => Some("ros-init"),
            ApiKind::Publisher => Some("publisher"),
            ApiKind::Subscriber => Some("subscriber"),
            ApiKind::ServiceProvider => Some("service-provider"),
            ApiKind::ServiceCaller => Some("service-caller"),
            ApiKind::WriteParam => Some("write-param"),
            ApiKind::DeleteParam => Some("delete-param"),
            ApiKind::ReadParam
            | ApiKind::ReadParamCached
            | ApiKind::ReadParamWithDefault
            | ApiKind::HasParam => None,
        }
    }

    /// True for the "reading" API kinds (§4.5): their call site is lifted
    /// to a value and assignment-wrapped rather than emitted directly as a
    /// side-effecting statement.
    pub const fn is_reading(self) -> bool {
        self.stmt_kind_str().is_none()
    }
}
