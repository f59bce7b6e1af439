// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The node-local context store: a string-keyed map of observed values
//! (timestamps, published sensor facts, `set()`-rule results) that
//! [`crate::rules::RuleEvaluator`] evaluates conditions against.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A value held in the context store. Rule conditions compare/combine
/// these; `set(key=value)` rules always write a `Str`, but numeric
/// comparisons coerce `Str` to `Number` where the string parses as one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Number(f64),
    Bool(bool),
    Str(String),
}

impl ContextValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ContextValue::Number(n) => Some(*n),
            ContextValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            ContextValue::Str(s) => s.parse::<f64>().ok(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ContextValue::Bool(b) => Some(*b),
            ContextValue::Number(n) => Some(*n != 0.0),
            ContextValue::Str(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        }
    }

    pub fn as_str(&self) -> String {
        match self {
            ContextValue::Str(s) => s.clone(),
            ContextValue::Number(n) => n.to_string(),
            ContextValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        if let Ok(n) = s.parse::<f64>() {
            ContextValue::Number(n)
        } else if let Ok(b) = s.parse::<bool>() {
            ContextValue::Bool(b)
        } else {
            ContextValue::Str(s.to_string())
        }
    }
}

impl From<f64> for ContextValue {
    fn from(n: f64) -> Self {
        ContextValue::Number(n)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Bool(b)
    }
}

/// Guarded by a single lock, per spec.md §5's shared-resource list. Cheap
/// reads dominate (the evaluator re-reads on every tick); writes come only
/// from `set()` rules and `publish` fact ingestion.
#[derive(Default)]
pub struct ContextStore {
    values: RwLock<HashMap<String, ContextValue>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<ContextValue> {
        self.values.read().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: ContextValue) {
        self.values.write().insert(key.into(), value);
    }

    pub fn snapshot(&self) -> HashMap<String, ContextValue> {
        self.values.read().clone()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
