// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ScienceGoal: the compiled, per-node form of a [`crate::job::Job`].

use serde::{Deserialize, Serialize};

use crate::hash::stable_hash;
use crate::plugin_spec::PluginSpec;

/// The slice of a [`ScienceGoal`] for a single node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubGoal {
    pub node: String,
    pub plugins: Vec<PluginSpec>,
    pub rules: Vec<String>,
    #[serde(default)]
    pub statements: Vec<String>,
}

impl SubGoal {
    pub fn new(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            plugins: Vec::new(),
            rules: Vec::new(),
            statements: Vec::new(),
        }
    }
}

/// Compiled, per-node form of a Job, ready to distribute to Node Schedulers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceGoal {
    pub id: String,
    pub name: String,
    pub sub_goals: Vec<SubGoal>,
    /// Raw per-goal condition strings, kept separate from per-SubGoal rules.
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl ScienceGoal {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sub_goals: Vec<SubGoal>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sub_goals,
            conditions: Vec::new(),
        }
    }

    /// Goal identity is a hash of the job ID and the sorted set of sub-goal
    /// node names, so re-validating the same job (same nodes) yields the
    /// same ID across re-submissions.
    pub fn stable_id(job_id: &str, sub_goal_node_names: &[String]) -> String {
        let mut names: Vec<&str> = sub_goal_node_names.iter().map(String::as_str).collect();
        names.sort_unstable();
        let mut parts = Vec::with_capacity(names.len() + 1);
        parts.push(job_id);
        parts.extend(names);
        stable_hash(&parts)
    }

    /// The SubGoal targeting `node`, matched case-insensitively.
    pub fn sub_goal_for_node(&self, node: &str) -> Option<&SubGoal> {
        self.sub_goals
            .iter()
            .find(|sg| sg.node.eq_ignore_ascii_case(node))
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.sub_goal_for_node(node).is_some()
    }

    pub fn node_names(&self) -> Vec<String> {
        self.sub_goals.iter().map(|sg| sg.node.clone()).collect()
    }
}

#[cfg(test)]
#[path = "science_goal_tests.rs"]
mod tests;
