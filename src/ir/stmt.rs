//! Symbolic statements (C1).

use serde_json::{json, Value as Json};

use super::value::{LocalRef, Value};

/// The closed family of statement nodes a function body lowers to.
///
/// Ordering within a [`super::function::SymbolicFunction::body`] vector is
/// the post-order emission order described by C4; `guard` (attached on the
/// wrapping [`Statement`], not here) carries the accumulated path condition
/// described by C6. `Compound` and `AnnotatedStmt` from the data model are
/// not separate variants here: a function body is already an ordered
/// `Vec<Statement>` (the compound), and each `Statement` carries its own
/// `guard` slot directly (the annotation), rather than wrapping a second
/// node around every statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `node.advertise("topic", ...)` and free-function equivalents.
    Publisher { topic: Value },
    /// `node.subscribe("topic", ...)`.
    Subscriber { topic: Value },
    /// `node.advertise_service("name", ...)`.
    ServiceProvider { name: Value },
    /// `node.service_client("name")` / a bare remote-service invocation;
    /// never assignment-wrapped even when its return value is bound to a
    /// local.
    ServiceCaller { name: Value },
    /// `node.set_param("name", value)`.
    WriteParam { name: Value, value: Value },
    /// `node.delete_param("name")`.
    DeleteParam { name: Value },
    /// `ros::init("name")` / `NodeHandle::new("name")`.
    RosInit { name: Value },
    /// `local = value`, where `value` may be an ordinary expression or one
    /// of the reading API values ([`Value::ReadParam`], etc.).
    Assignment { target: LocalRef, value: Value },
    /// A call to another function in the same translation unit, resolved by
    /// name against the program's function table rather than owned directly
    /// (see the `FunctionCall` invariant in `DESIGN.md`).
    Call { callee: String, arguments: Vec<Value> },
}

impl Stmt {
    fn to_json(&self) -> Json {
        match self {
            Stmt::Publisher { topic } => json!({"kind": "publisher", "topic": topic.to_json()}),
            Stmt::Subscriber { topic } => json!({"kind": "subscriber", "topic": topic.to_json()}),
            Stmt::ServiceProvider { name } => {
                json!({"kind": "service-provider", "name": name.to_json()})
            }
            Stmt::ServiceCaller { name } => {
                json!({"kind": "service-caller", "name": name.to_json()})
            }
            Stmt::WriteParam { name, value } => json!({
                "kind": "write-param",
                "name": name.to_json(),
                "value": value.to_json(),
            }),
            Stmt::DeleteParam { name } => json!({"kind": "delete-param", "name": name.to_json()}),
            Stmt::RosInit { name } => json!({"kind": "ros-init", "name": name.to_json()}),
            Stmt::Assignment { target, value } => json!({
                "kind": "assignment",
                "target": target_json(*target),
                "value": value.to_json(),
            }),
            Stmt::Call { callee, arguments } => json!({
                "kind": "call",
                "callee": callee,
                "arguments": arguments.iter().map(Value::to_json).collect::<Vec<_>>(),
            }),
        }
    }
}

fn target_json(target: LocalRef) -> Json {
    match target {
        LocalRef::Parameter(index) => json!({"scope": "parameter", "index": index}),
        LocalRef::Local(id) => json!({"scope": "local", "id": id}),
    }
}

/// A statement together with its accumulated path condition (C6).
///
/// `guard` is `None` when the conjunction is trivially `true` (the statement
/// is unconditionally reached); serialization omits the `executed-if` field
/// in that case rather than emitting a literal `true` value.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub stmt: Stmt,
    pub guard: Option<Value>,
    pub source_location: String,
}

impl Statement {
    pub fn new(stmt: Stmt, guard: Option<Value>, source_location: impl Into<String>) -> Self {
        let guard = guard.filter(|g| !g.is_trivially_true());
        Statement {
            stmt,
            guard,
            source_location: source_location.into(),
        }
    }

    pub fn to_json(&self) -> Json {
        let mut obj = self.stmt.to_json();
        if let Json::Object(map) = &mut obj {
            if let Some(guard) = &self.guard {
                map.insert("executed-if".to_string(), guard.to_json());
            }
            map.insert(
                "source-location".to_string(),
                Json::String(self.source_location.clone()),
            );
        }
        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::value::SymbolicType;

    #[test]
    fn unconditional_statement_omits_guard() {
        let s = Statement::new(
            Stmt::RosInit {
                name: Value::StringLiteral("talker".into()),
            },
            Some(Value::BoolLiteral(true)),
            "main.rs:1:1",
        );
        let j = s.to_json();
        assert!(j.get("executed-if").is_none());
    }

    #[test]
    fn conditional_statement_serializes_guard() {
        let guard = Value::VariableReference(LocalRef::Parameter(0));
        let s = Statement::new(
            Stmt::Subscriber {
                topic: Value::unknown(SymbolicType::String),
            },
            Some(guard.clone()),
            "main.rs:2:5",
        );
        let j = s.to_json();
        assert_eq!(j["executed-if"], guard.to_json());
        assert_eq!(j["source-location"], "main.rs:2:5");
    }

    #[test]
    fn service_caller_is_never_assignment_wrapped() {
        let stmt = Stmt::ServiceCaller {
            name: Value::StringLiteral("add_two_ints".into()),
        };
        match stmt.to_json()["kind"].as_str() {
            Some("service-caller") => (),
            other => panic!("expected service-caller, got {other:?}"),
        }
    }
}
