// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Evaluates a parsed [`Expr`] against a [`ContextStore`] snapshot and the
//! current time. Pure: no side effects, no mutation of the store.

use chrono::{TimeZone, Utc};

use crate::context::{ContextStore, ContextValue};
use crate::error::{NodeError, NodeResult};

use super::cron;
use super::expr::Expr;

pub fn evaluate(expr: &Expr, store: &ContextStore, now_unix: i64) -> NodeResult<ContextValue> {
    match expr {
        Expr::Number(n) => Ok(ContextValue::Number(*n)),
        Expr::Str(s) => Ok(ContextValue::Str(s.clone())),
        Expr::Bool(b) => Ok(ContextValue::Bool(*b)),
        Expr::Ident(name) => Ok(store
            .get(name)
            .unwrap_or(ContextValue::Bool(false))),
        Expr::Unary("-", inner) => {
            let v = evaluate(inner, store, now_unix)?;
            let n = v
                .as_f64()
                .ok_or_else(|| NodeError::Condition(format!("cannot negate {v:?}")))?;
            Ok(ContextValue::Number(-n))
        }
        Expr::Unary("!", inner) => {
            let v = evaluate(inner, store, now_unix)?;
            let b = v
                .as_bool()
                .ok_or_else(|| NodeError::Condition(format!("cannot negate non-boolean {v:?}")))?;
            Ok(ContextValue::Bool(!b))
        }
        Expr::Unary(op, _) => Err(NodeError::Condition(format!("unknown unary operator {op}"))),
        Expr::Binary("&&", l, r) => {
            let lb = evaluate(l, store, now_unix)?.as_bool().unwrap_or(false);
            if !lb {
                return Ok(ContextValue::Bool(false));
            }
            let rb = evaluate(r, store, now_unix)?.as_bool().unwrap_or(false);
            Ok(ContextValue::Bool(rb))
        }
        Expr::Binary("||", l, r) => {
            let lb = evaluate(l, store, now_unix)?.as_bool().unwrap_or(false);
            if lb {
                return Ok(ContextValue::Bool(true));
            }
            let rb = evaluate(r, store, now_unix)?.as_bool().unwrap_or(false);
            Ok(ContextValue::Bool(rb))
        }
        Expr::Binary(op @ ("==" | "!="), l, r) => {
            let lv = evaluate(l, store, now_unix)?;
            let rv = evaluate(r, store, now_unix)?;
            let eq = values_equal(&lv, &rv);
            Ok(ContextValue::Bool(if *op == "==" { eq } else { !eq }))
        }
        Expr::Binary(op @ (">" | "<" | ">=" | "<="), l, r) => {
            let ln = numeric(evaluate(l, store, now_unix)?)?;
            let rn = numeric(evaluate(r, store, now_unix)?)?;
            let result = match *op {
                ">" => ln > rn,
                "<" => ln < rn,
                ">=" => ln >= rn,
                "<=" => ln <= rn,
                _ => unreachable!(),
            };
            Ok(ContextValue::Bool(result))
        }
        Expr::Binary(op @ ("+" | "-" | "*" | "/"), l, r) => {
            let ln = numeric(evaluate(l, store, now_unix)?)?;
            let rn = numeric(evaluate(r, store, now_unix)?)?;
            let result = match *op {
                "+" => ln + rn,
                "-" => ln - rn,
                "*" => ln * rn,
                "/" => {
                    if rn == 0.0 {
                        return Err(NodeError::Condition("division by zero".into()));
                    }
                    ln / rn
                }
                _ => unreachable!(),
            };
            Ok(ContextValue::Number(result))
        }
        Expr::Binary(op, ..) => Err(NodeError::Condition(format!("unknown operator {op}"))),
        Expr::Call(name, args) => call(name, args, store, now_unix),
    }
}

fn numeric(v: ContextValue) -> NodeResult<f64> {
    v.as_f64()
        .ok_or_else(|| NodeError::Condition(format!("expected numeric value, got {v:?}")))
}

fn values_equal(a: &ContextValue, b: &ContextValue) -> bool {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x == y;
    }
    a.as_str() == b.as_str()
}

fn call(
    name: &str,
    args: &[Expr],
    store: &ContextStore,
    now_unix: i64,
) -> NodeResult<ContextValue> {
    match name {
        "now" => {
            if !args.is_empty() {
                return Err(NodeError::Condition("now() takes no arguments".into()));
            }
            Ok(ContextValue::Number(now_unix as f64))
        }
        "cronjob" => {
            if args.len() != 2 {
                return Err(NodeError::Condition(
                    "cronjob(name, expr) takes exactly 2 arguments".into(),
                ));
            }
            let Expr::Str(expr) = &args[1] else {
                return Err(NodeError::Condition(
                    "cronjob()'s second argument must be a string literal".into(),
                ));
            };
            let at = Utc
                .timestamp_opt(now_unix, 0)
                .single()
                .ok_or_else(|| NodeError::Condition("invalid timestamp for cronjob()".into()))?;
            Ok(ContextValue::Bool(cron::matches(expr, at)?))
        }
        other => Err(NodeError::Condition(format!("unknown function {other}"))),
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod tests;
