// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events produced by the goal manager and scheduler, consumed by
//! subscribers. Immutable once built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::job::Job;
use crate::plugin::Plugin;
use crate::science_goal::ScienceGoal;

/// The kind of lifecycle event. `Display` yields the exact string used as
/// both the SSE `event:` field and the job/goal status-change log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    GoalStatusSubmitted,
    JobStatusSuspended,
    JobStatusRemoved,
    JobStatusComplete,
    GoalAdded,
    GoalUpdated,
    GoalRemoved,
    PluginStatusRunnable,
    PluginStatusStoppable,
    PluginStatusRunning,
    PluginStatusDone,
}

crate::simple_display! {
    EventType {
        GoalStatusSubmitted => "EventGoalStatusSubmitted",
        JobStatusSuspended => "EventJobStatusSuspended",
        JobStatusRemoved => "EventJobStatusRemoved",
        JobStatusComplete => "EventJobStatusComplete",
        GoalAdded => "EventGoalAdded",
        GoalUpdated => "EventGoalUpdated",
        GoalRemoved => "EventGoalRemoved",
        PluginStatusRunnable => "EventPluginStatusRunnable",
        PluginStatusStoppable => "EventPluginStatusStoppable",
        PluginStatusRunning => "EventPluginStatusRunning",
        PluginStatusDone => "EventPluginStatusDone",
    }
}

/// The event payload. Every field is optional; which are populated depends
/// on `EventType`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<ScienceGoal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<Plugin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl EventBody {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_job(mut self, job: Job) -> Self {
        self.job = Some(job);
        self
    }

    pub fn with_goal(mut self, goal: ScienceGoal) -> Self {
        self.goal = Some(goal);
        self
    }

    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        self.plugin = Some(plugin);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// A single lifecycle event, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub body: EventBody,
}

impl Event {
    pub fn new(event_type: EventType, timestamp: DateTime<Utc>, body: EventBody) -> Self {
        Self {
            event_type,
            timestamp,
            body,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
