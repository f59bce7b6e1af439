// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sg-node: the Node Scheduler tier. Receives per-node ScienceGoals,
//! evaluates their rules against a local context store, queues schedulable
//! plugins, and dispatches them to a cluster through the `ResourceManager`
//! capability interface.

pub mod config;
pub mod context;
pub mod error;
pub mod goal_manager;
pub mod goal_source;
pub mod queue;
pub mod rules;
pub mod scheduler;

pub use context::{ContextStore, ContextValue};
pub use error::{NodeError, NodeResult};
pub use goal_manager::{GoalChange, NodeGoalManager};
pub use goal_source::GoalSource;
pub use queue::PluginQueue;
pub use rules::{EvaluationOutcome, PublishEvent, RuleEvaluator, ScheduleDecision};
pub use scheduler::{NodeScheduler, PublishSink, TracingPublishSink};
