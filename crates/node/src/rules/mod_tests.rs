use super::*;
use crate::context::ContextValue;

fn rules(raw: &[&str]) -> RuleEvaluator {
    RuleEvaluator::parse(&raw.iter().map(|s| s.to_string()).collect::<Vec<_>>()).unwrap()
}

#[test]
fn schedule_rule_yields_decision_per_condition() {
    let store = ContextStore::new();
    store.set("ready", ContextValue::from(true));
    let engine = rules(&["schedule(worker): ready"]);

    let outcome = engine.evaluate(&store, 0).unwrap();
    assert_eq!(
        outcome.decisions,
        vec![ScheduleDecision {
            plugin: "worker".to_string(),
            runnable: true,
        }]
    );
    assert!(outcome.publishes.is_empty());
}

#[test]
fn schedule_rule_false_condition_yields_not_runnable() {
    let store = ContextStore::new();
    let engine = rules(&["schedule(worker): ready"]);

    let outcome = engine.evaluate(&store, 0).unwrap();
    assert_eq!(outcome.decisions[0].runnable, false);
}

#[test]
fn publish_rule_fires_only_when_condition_true() {
    let store = ContextStore::new();
    store.set("high", ContextValue::from(true));
    let engine = rules(&["publish(alert,severity=high): high"]);

    let outcome = engine.evaluate(&store, 0).unwrap();
    assert_eq!(outcome.publishes.len(), 1);
    assert_eq!(outcome.publishes[0].topic, "alert");
    assert_eq!(
        outcome.publishes[0].parameters.get("severity").map(String::as_str),
        Some("high")
    );
}

#[test]
fn publish_rule_suppressed_when_condition_false() {
    let store = ContextStore::new();
    let engine = rules(&["publish(alert): false"]);
    let outcome = engine.evaluate(&store, 0).unwrap();
    assert!(outcome.publishes.is_empty());
}

#[test]
fn set_rule_with_key_value_object_writes_context() {
    let store = ContextStore::new();
    let engine = rules(&["set(mode=fast): true"]);
    engine.evaluate(&store, 0).unwrap();
    assert_eq!(store.get("mode"), Some(ContextValue::Str("fast".to_string())));
}

#[test]
fn set_rule_with_multiple_assignments_writes_every_key() {
    let store = ContextStore::new();
    let engine = rules(&["set(a=1, b=2): true"]);
    engine.evaluate(&store, 0).unwrap();
    assert_eq!(store.get("a"), Some(ContextValue::Number(1.0)));
    assert_eq!(store.get("b"), Some(ContextValue::Number(2.0)));
}

#[test]
fn set_rule_applies_before_later_rules_in_same_pass() {
    let store = ContextStore::new();
    let engine = rules(&["set(unlocked=true): true", "schedule(worker): unlocked"]);
    let outcome = engine.evaluate(&store, 0).unwrap();
    assert_eq!(outcome.decisions[0].runnable, true);
}

#[test]
fn rule_count_matches_parsed_rules() {
    let engine = rules(&["schedule(a): true", "publish(b): true"]);
    assert_eq!(engine.rule_count(), 2);
}
