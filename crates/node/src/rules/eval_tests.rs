use super::*;
use crate::context::ContextValue;
use crate::rules::expr::parse;

fn eval_str(condition: &str, store: &ContextStore, now_unix: i64) -> ContextValue {
    evaluate(&parse(condition).unwrap(), store, now_unix).unwrap()
}

#[test]
fn relational_condition_over_context_value() {
    let store = ContextStore::new();
    store.set("v", ContextValue::from(2.0));
    assert_eq!(eval_str("v > 3", &store, 0), ContextValue::Bool(false));

    store.set("v", ContextValue::from(5.0));
    assert_eq!(eval_str("v > 3", &store, 0), ContextValue::Bool(true));
}

#[test]
fn missing_identifier_defaults_falsy() {
    let store = ContextStore::new();
    assert_eq!(eval_str("missing", &store, 0), ContextValue::Bool(false));
}

#[test]
fn boolean_short_circuit_and_or() {
    let store = ContextStore::new();
    store.set("a", ContextValue::from(true));
    store.set("b", ContextValue::from(false));
    assert_eq!(eval_str("a && b", &store, 0), ContextValue::Bool(false));
    assert_eq!(eval_str("a || b", &store, 0), ContextValue::Bool(true));
}

#[test]
fn arithmetic_and_comparison_compose() {
    let store = ContextStore::new();
    store.set("v", ContextValue::from(4.0));
    assert_eq!(eval_str("(v + 1) * 2 >= 10", &store, 0), ContextValue::Bool(true));
}

#[test]
fn now_builtin_returns_injected_clock() {
    let store = ContextStore::new();
    assert_eq!(eval_str("now()", &store, 12345), ContextValue::Number(12345.0));
}

#[test]
fn cronjob_builtin_matches_against_injected_clock() {
    let store = ContextStore::new();
    // 2026-01-01T00:00:00Z
    let midnight = 1_767_225_600;
    assert_eq!(
        eval_str("cronjob('x', '0 0 * * *')", &store, midnight),
        ContextValue::Bool(true)
    );
    assert_eq!(
        eval_str("cronjob('x', '0 0 * * *')", &store, midnight + 60),
        ContextValue::Bool(false)
    );
}

#[test]
fn division_by_zero_is_an_error() {
    let store = ContextStore::new();
    let err = evaluate(&parse("1 / 0").unwrap(), &store, 0);
    assert!(err.is_err());
}

#[test]
fn unknown_function_is_an_error() {
    let store = ContextStore::new();
    let err = evaluate(&parse("mystery()").unwrap(), &store, 0);
    assert!(err.is_err());
}
