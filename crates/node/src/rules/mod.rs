// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule evaluator: parses `ScienceRule`s once per goal update and
//! re-evaluates every `condition` against the live [`ContextStore`] on
//! every tick, per spec.md §4.4.
//!
//! # Module layout
//! - [`expr`] — condition grammar: lexer, recursive-descent parser, AST
//! - [`cron`] — the `cronjob(name, expr)` builtin's 5-field phase matcher
//! - [`eval`] — pure `Expr` evaluation against a context snapshot

pub mod cron;
mod eval;
pub mod expr;

use sg_core::{ActionType, ScienceRule, SgResult};

use crate::context::{ContextStore, ContextValue};
use crate::error::NodeResult;

/// A single `publish(topic, ...): condition` firing, handed to whatever
/// sink the node scheduler wires up (the broker client, in production).
#[derive(Debug, Clone, PartialEq)]
pub struct PublishEvent {
    pub topic: String,
    pub parameters: std::collections::BTreeMap<String, String>,
}

/// The outcome of evaluating one `schedule(plugin, ...): condition` rule:
/// whether the named plugin should currently be considered `Runnable`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDecision {
    pub plugin: String,
    pub runnable: bool,
}

/// One evaluation pass's full outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationOutcome {
    pub decisions: Vec<ScheduleDecision>,
    pub publishes: Vec<PublishEvent>,
}

/// Holds a goal's parsed rules and evaluates them against a [`ContextStore`]
/// every tick. Parsing happens once (at construction, from already-validated
/// `ScienceRule` strings); evaluation is cheap and re-run freely.
pub struct RuleEvaluator {
    rules: Vec<ScienceRule>,
}

impl RuleEvaluator {
    /// Rules are parsed ahead of time by the cloud-side validator (§4.1) and
    /// carried on the SubGoal as raw strings; re-parsing here keeps the
    /// node side independent of the cloud's in-memory `ScienceRule` values
    /// (only the raw strings cross the wire).
    pub fn parse(raw_rules: &[String]) -> SgResult<Self> {
        let rules = raw_rules
            .iter()
            .map(|r| ScienceRule::parse(r))
            .collect::<SgResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluate every rule once against `store` at `now_unix`, applying
    /// `set()` rules directly to `store` (so later rules in the same pass
    /// observe them) and collecting `schedule()`/`publish()` outcomes for
    /// the caller to apply.
    pub fn evaluate(&self, store: &ContextStore, now_unix: i64) -> NodeResult<EvaluationOutcome> {
        let mut outcome = EvaluationOutcome::default();

        for rule in &self.rules {
            let expr = expr::parse(&rule.condition)?;
            let value = eval::evaluate(&expr, store, now_unix)?;
            let condition_true = value.as_bool().unwrap_or(false);

            match rule.action {
                ActionType::Schedule => outcome.decisions.push(ScheduleDecision {
                    plugin: rule.object.clone(),
                    runnable: condition_true,
                }),
                ActionType::Publish => {
                    if condition_true {
                        outcome.publishes.push(PublishEvent {
                            topic: rule.object.clone(),
                            parameters: rule.parameters.clone(),
                        });
                    }
                }
                ActionType::Set => {
                    if condition_true {
                        // The first `key=value` pair lands in `object`
                        // (the action-object token), every subsequent one
                        // in `parameters`; both must be applied for
                        // `set(a=1, b=2): cond` to upsert both keys.
                        if let Some((key, value)) = rule.object.split_once('=') {
                            store.set(key.trim(), ContextValue::from(value.trim()));
                        }
                        for (key, value) in &rule.parameters {
                            store.set(key.clone(), ContextValue::from(value.as_str()));
                        }
                    }
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
