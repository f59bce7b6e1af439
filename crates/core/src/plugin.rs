// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin instance state: a running (or pending) workload bound to a goal.

use serde::{Deserialize, Serialize};

use crate::plugin_spec::PluginSpec;

/// Whether rules currently want this plugin runnable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ContextStatus {
    Runnable,
    Stoppable,
}

crate::simple_display! {
    ContextStatus {
        Runnable => "Runnable",
        Stoppable => "Stoppable",
    }
}

/// Whether the cluster currently has this plugin running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SchedulingStatus {
    Waiting,
    Ready,
    Running,
}

crate::simple_display! {
    SchedulingStatus {
        Waiting => "Waiting",
        Ready => "Ready",
        Running => "Running",
    }
}

/// A plugin instance carried by a SubGoal: its spec, parent goal, and the two
/// independent status axes rules/cluster drive it through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,
    pub plugin_spec: PluginSpec,
    pub goal_id: String,
    pub context_status: ContextStatus,
    pub scheduling_status: SchedulingStatus,
}

impl Plugin {
    pub fn new(name: impl Into<String>, plugin_spec: PluginSpec, goal_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plugin_spec,
            goal_id: goal_id.into(),
            context_status: ContextStatus::Stoppable,
            scheduling_status: SchedulingStatus::Waiting,
        }
    }

    /// Schedulable iff rules currently want it runnable and it isn't already running.
    pub fn is_schedulable(&self) -> bool {
        self.context_status == ContextStatus::Runnable
            && self.scheduling_status != SchedulingStatus::Running
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct PluginBuilder => Plugin {
        into { name: String = "test-plugin" }
        set { plugin_spec: PluginSpec = PluginSpec::new("reg.io/test:1.0.0") }
        into { goal_id: String = "goal-test" }
        set { context_status: ContextStatus = ContextStatus::Stoppable }
        set { scheduling_status: SchedulingStatus = SchedulingStatus::Waiting }
    }
}

#[cfg(test)]
#[path = "plugin_tests.rs"]
mod tests;
