//! Integration tests for the whole nodescope pipeline.
//!
//! Each fixture is a standalone Rust source file written to a temporary
//! directory and fed through `nodescope::run`/`Config`, covering spec §8's
//! concrete scenarios end-to-end (catalog → driver → IR) rather than any
//! single component in isolation.

use std::fs;
use std::path::PathBuf;

use nodescope::config::Config;
use nodescope::ir::{LocalRef, Stmt, SymbolicType, Value};

fn write_fixture(dir: &tempfile::TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn unconditional_publisher_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "talker.rs",
        r#"
        fn setup(n: &NodeHandle) {
            n.advertise("chatter", 10);
        }
        "#,
    );
    let config = Config::new(vec![path]);
    let program = nodescope::run(&config).unwrap();

    let setup = &program.functions["setup"];
    assert_eq!(setup.body.len(), 1);
    assert_eq!(
        setup.body[0].stmt,
        Stmt::Publisher {
            topic: Value::StringLiteral("chatter".into())
        }
    );
    assert!(setup.body[0].guard.is_none());
}

#[test]
fn conditional_subscriber_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "listener.rs",
        r#"
        fn setup(n: &NodeHandle, use_sensor: bool) {
            if use_sensor {
                n.subscribe("scan", 10);
            }
        }
        "#,
    );
    let config = Config::new(vec![path]);
    let program = nodescope::run(&config).unwrap();

    let setup = &program.functions["setup"];
    assert_eq!(
        setup.body[0].stmt,
        Stmt::Subscriber {
            topic: Value::StringLiteral("scan".into())
        }
    );
    assert_eq!(
        setup.body[0].guard,
        Some(Value::VariableReference(LocalRef::Parameter(1)))
    );
}

#[test]
fn parameter_read_with_default_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "params.rs",
        r#"
        fn setup(n: &NodeHandle) {
            let rate = n.get_param_with_default("rate", 10.0);
        }
        "#,
    );
    let config = Config::new(vec![path]);
    let program = nodescope::run(&config).unwrap();

    let setup = &program.functions["setup"];
    match &setup.body[0].stmt {
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
    assert!(setup.body[0].guard.is_none());
}

#[test]
fn parameter_name_via_unknown_variable_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "dynparam.rs",
        r#"
        fn setup(n: &NodeHandle, topic_name: String) {
            n.get_param(topic_name);
        }
        "#,
    );
    let config = Config::new(vec![path]);
    let program = nodescope::run(&config).unwrap();

    let setup = &program.functions["setup"];
    match &setup.body[0].stmt {
        Stmt::Assignment { value, .. } => {
            assert_eq!(*value, Value::ReadParam(Box::new(Value::unknown(SymbolicType::String))));
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn inter_procedural_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "two_fns.rs",
        r#"
        fn a(n: &NodeHandle) {
            b(n);
        }
        fn b(n: &NodeHandle) {
            n.advertise("x", 1);
        }
        "#,
    );
    let config = Config::new(vec![path]);
    let program = nodescope::run(&config).unwrap();

    assert!(program.functions.contains_key("a"));
    assert!(program.functions.contains_key("b"));
    match &program.functions["a"].body[0].stmt {
        Stmt::Call { callee, .. } => assert_eq!(callee, "b"),
        other => panic!("expected call, got {other:?}"),
    }
    assert_eq!(
        program.functions["b"].body[0].stmt,
        Stmt::Publisher {
            topic: Value::StringLiteral("x".into())
        }
    );
}

#[test]
fn negated_guard_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "teardown.rs",
        r#"
        fn teardown(n: &NodeHandle, enabled: bool) {
            if !enabled {
                n.delete_param("p");
            }
        }
        "#,
    );
    let config = Config::new(vec![path]);
    let program = nodescope::run(&config).unwrap();

    let teardown = &program.functions["teardown"];
    assert_eq!(
        teardown.body[0].guard,
        Some(Value::Negate(Box::new(Value::VariableReference(LocalRef::Parameter(1)))))
    );
}

#[test]
fn functions_with_no_api_calls_are_excluded_from_the_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "helpers.rs",
        r#"
        fn helper(x: i32) -> i32 {
            x + 1
        }
        fn setup(n: &NodeHandle) {
            n.advertise("chatter", 10);
        }
        "#,
    );
    let config = Config::new(vec![path]);
    let program = nodescope::run(&config).unwrap();

    assert!(program.functions.contains_key("setup"));
    assert!(!program.functions.contains_key("helper"));
}

#[test]
fn running_the_pipeline_twice_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "talker.rs",
        r#"
        fn setup(n: &NodeHandle, use_sensor: bool) {
            n.advertise("chatter", 10);
            if use_sensor {
                n.subscribe("scan", 10);
            }
        }
        "#,
    );
    let config = Config::new(vec![path]);
    let first = nodescope::run(&config).unwrap();
    let second = nodescope::run(&config).unwrap();
    assert_eq!(first.to_json(), second.to_json());
}

#[test]
fn write_output_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "talker.rs",
        r#"
        fn setup(n: &NodeHandle) {
            n.advertise("chatter", 10);
        }
        "#,
    );
    let mut config = Config::new(vec![path]);
    config.output_filename = dir.path().join("node-summary.json");
    let program = nodescope::run(&config).unwrap();
    nodescope::serializer::write_output(&program, &config.output_filename).unwrap();

    let written = fs::read_to_string(&config.output_filename).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, program.to_json());
}
