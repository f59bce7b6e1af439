// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job: the user-authored description of what should run where, with rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::plugin_spec::PluginSpec;
use crate::science_goal::ScienceGoal;

/// Server-assigned job identifier: a monotonically increasing sequence number
/// from the jobs bucket, rendered as a decimal string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub const UNASSIGNED: JobId = JobId(0);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Lifecycle status of a [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum JobStatus {
    Created,
    Submitted,
    Running,
    Suspended,
    Removed,
    Complete,
}

crate::simple_display! {
    JobStatus {
        Created => "Created",
        Submitted => "Submitted",
        Running => "Running",
        Suspended => "Suspended",
        Removed => "Removed",
        Complete => "Complete",
    }
}

impl JobStatus {
    /// Only `Created` and `Suspended` jobs may be (re-)submitted.
    pub fn resubmittable(self) -> bool {
        matches!(self, JobStatus::Created | JobStatus::Suspended)
    }

    /// Terminal statuses never transition further.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Removed | JobStatus::Complete)
    }
}

/// A user-authored description of what should run where, with rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default = "JobId::default")]
    pub id: JobId,
    pub name: String,
    pub user: String,
    #[serde(default)]
    pub plugins: Vec<PluginSpec>,
    #[serde(default)]
    pub node_tags: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub science_rules: Vec<String>,
    #[serde(default)]
    pub success_criteria: Vec<String>,
    #[serde(default = "JobStatus::default_created")]
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub science_goal: Option<ScienceGoal>,
}

impl Default for JobId {
    fn default() -> Self {
        JobId::UNASSIGNED
    }
}

impl JobStatus {
    fn default_created() -> Self {
        JobStatus::Created
    }
}

impl Job {
    /// Construct a freshly-authored job, not yet assigned an ID.
    pub fn new(name: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: JobId::UNASSIGNED,
            name: name.into(),
            user: user.into(),
            plugins: Vec::new(),
            node_tags: Vec::new(),
            nodes: Vec::new(),
            science_rules: Vec::new(),
            success_criteria: Vec::new(),
            status: JobStatus::Created,
            science_goal: None,
        }
    }

    /// Apply a partial edit (as accepted by `POST /edit`): only `Some` fields
    /// on `patch` overwrite the corresponding field on `self`.
    pub fn apply_edit(&mut self, patch: JobPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(plugins) = patch.plugins {
            self.plugins = plugins;
        }
        if let Some(node_tags) = patch.node_tags {
            self.node_tags = node_tags;
        }
        if let Some(nodes) = patch.nodes {
            self.nodes = nodes;
        }
        if let Some(science_rules) = patch.science_rules {
            self.science_rules = science_rules;
        }
        if let Some(success_criteria) = patch.success_criteria {
            self.success_criteria = success_criteria;
        }
    }
}

/// A partial Job body, as accepted by `POST /edit`. Every field is optional;
/// unset fields leave the corresponding Job field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub plugins: Option<Vec<PluginSpec>>,
    #[serde(default)]
    pub node_tags: Option<Vec<String>>,
    #[serde(default)]
    pub nodes: Option<Vec<String>>,
    #[serde(default)]
    pub science_rules: Option<Vec<String>>,
    #[serde(default)]
    pub success_criteria: Option<Vec<String>>,
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct JobBuilder => Job {
        computed { id: JobId = JobId::UNASSIGNED }
        into { name: String = "test-job" }
        into { user: String = "tester" }
        set { plugins: Vec<PluginSpec> = Vec::new() }
        set { node_tags: Vec<String> = Vec::new() }
        set { nodes: Vec<String> = Vec::new() }
        set { science_rules: Vec<String> = Vec::new() }
        set { success_criteria: Vec<String> = Vec::new() }
        set { status: JobStatus = JobStatus::Created }
        option { science_goal: ScienceGoal = None }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
