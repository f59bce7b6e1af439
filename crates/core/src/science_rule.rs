// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ScienceRule: the declarative `ACTION(OBJECT[,K=V...]): CONDITION` grammar
//! binding a scheduling action to a condition over the node-local context
//! store. Parsing lives here; evaluation against a context store is a
//! node-side concern (`sg-node::rules`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{SgError, SgResult};

/// The action named by a rule's head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// `schedule(plugin, k=v...): condition` — gates a plugin's `ContextStatus`.
    Schedule,
    /// `publish(topic, ...): condition` — emits a named event to the broker.
    Publish,
    /// `set(key=value, ...): condition` — upserts the context store.
    Set,
}

crate::simple_display! {
    ActionType {
        Schedule => "schedule",
        Publish => "publish",
        Set => "set",
    }
}

impl FromStr for ActionType {
    type Err = SgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "schedule" => Ok(ActionType::Schedule),
            "publish" => Ok(ActionType::Publish),
            "set" => Ok(ActionType::Set),
            other => Err(SgError::validation(format!("unknown rule action {other:?}"))),
        }
    }
}

/// A parsed science rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceRule {
    pub raw: String,
    pub action: ActionType,
    pub object: String,
    pub parameters: BTreeMap<String, String>,
    pub condition: String,
}

impl ScienceRule {
    /// Parse `ACTION(OBJECT[,K=V...]): CONDITION`. The object is the first
    /// comma-separated token inside the parens; subsequent tokens must be
    /// `key=value` pairs. Parse failure is fatal to the enclosing job
    /// validation (rules are all-or-nothing per job).
    pub fn parse(raw: &str) -> SgResult<Self> {
        let trimmed = raw.trim();

        // Split at the first `):` boundary, not the first bare `:` — a
        // parameter or object token may itself contain a colon (an image
        // tag, a time-of-day literal), which a naive `split_once(':')`
        // would cut in the middle of.
        let close = trimmed
            .find("):")
            .ok_or_else(|| SgError::validation(format!("rule missing '):': {trimmed:?}")))?;
        let head = trimmed[..=close].trim();
        let condition = &trimmed[close + 2..];

        let open = head
            .find('(')
            .ok_or_else(|| SgError::validation(format!("rule missing '(': {trimmed:?}")))?;

        let action = head[..open].trim().parse::<ActionType>()?;
        let body = &head[open + 1..head.len() - 1];
        let mut tokens = body.split(',').map(str::trim).filter(|s| !s.is_empty());

        let object = tokens
            .next()
            .ok_or_else(|| SgError::validation(format!("rule missing object: {trimmed:?}")))?
            .to_string();

        let mut parameters = BTreeMap::new();
        for token in tokens {
            let (k, v) = token.split_once('=').ok_or_else(|| {
                SgError::validation(format!(
                    "malformed rule parameter {token:?} in {trimmed:?}"
                ))
            })?;
            parameters.insert(k.trim().to_string(), v.trim().to_string());
        }

        Ok(Self {
            raw: trimmed.to_string(),
            action,
            object,
            parameters,
            condition: condition.trim().to_string(),
        })
    }
}

impl fmt::Display for ScienceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
#[path = "science_rule_tests.rs"]
mod tests;
