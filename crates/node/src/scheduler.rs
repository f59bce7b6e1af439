// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node Scheduler: the central coordinator reacting to rule-evaluator
//! ticks, goal updates, and resource-manager watch events, per spec.md
//! §4.5. Grounded on `resourcemanager.go`'s `LaunchAndWatchPlugin` and on
//! the `tokio::select!`-over-bounded-channels coordinator idiom the
//! daemon's listener task uses, adapted so every spawned watcher is
//! tracked in a `JoinSet` instead of fired-and-forgotten.
//!
//! The `reserved` flag approximates "at most one plugin runs at a time on
//! this node" (§4.5's policy knob); it is a simplifying assumption, not a
//! resource-fit computation.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use sg_adapters::{Credential, ResourceManager, WorkloadPhase};
use sg_core::{
    ContextStatus, Event, EventBody, EventType, Plugin, PluginSpec, SchedulingStatus,
};

use crate::context::ContextStore;
use crate::error::{NodeError, NodeResult};
use crate::goal_manager::{GoalChange, NodeGoalManager};
use crate::queue::PluginQueue;
use crate::rules::RuleEvaluator;

/// Sink for `publish(topic, ...)` rule firings. The data-plane publish
/// path itself is an external collaborator (§1's Non-goals exclude
/// "notification transport to external push endpoints"); production
/// deployments implement this against the broker's data API.
pub trait PublishSink: Send + Sync {
    fn publish(&self, topic: &str, parameters: &BTreeMap<String, String>);
}

/// Default sink: logs the firing instead of delivering it anywhere.
pub struct TracingPublishSink;

impl PublishSink for TracingPublishSink {
    fn publish(&self, topic: &str, parameters: &BTreeMap<String, String>) {
        info!(topic, ?parameters, "publish rule fired");
    }
}

/// Watcher retry/backoff policy for `LaunchAndWatch`, per spec.md §4.6.
const WATCH_RETRIES: u32 = 3;
const WATCH_BACKOFF: Duration = Duration::from_secs(3);
const GC_TTL: Duration = Duration::from_secs(600);
const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct NodeScheduler<R: ResourceManager + 'static> {
    node_name: String,
    goal_manager: Arc<NodeGoalManager>,
    context: Arc<ContextStore>,
    queue: Arc<PluginQueue>,
    resource_manager: Arc<R>,
    reserved: Arc<Mutex<bool>>,
    plugins: Mutex<HashMap<String, Plugin>>,
    rule_evaluator: Mutex<Option<RuleEvaluator>>,
    events: mpsc::Sender<Event>,
    watchers: Mutex<JoinSet<()>>,
}

impl<R: ResourceManager + 'static> NodeScheduler<R> {
    pub fn new(
        node_name: impl Into<String>,
        goal_manager: Arc<NodeGoalManager>,
        context: Arc<ContextStore>,
        queue: Arc<PluginQueue>,
        resource_manager: Arc<R>,
    ) -> (Arc<Self>, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(100);
        let scheduler = Arc::new(Self {
            node_name: node_name.into(),
            goal_manager,
            context,
            queue,
            resource_manager,
            reserved: Arc::new(Mutex::new(false)),
            plugins: Mutex::new(HashMap::new()),
            rule_evaluator: Mutex::new(None),
            events: tx,
            watchers: Mutex::new(JoinSet::new()),
        });
        (scheduler, rx)
    }

    /// Applies a freshly received goal snapshot: diffs it into the node
    /// goal manager, rebuilds the known plugin set from the current
    /// SubGoal plugin lists (preserving in-flight status for plugins that
    /// survive), and re-parses the rule set.
    pub fn apply_goals(&self, snapshot: Vec<sg_core::ScienceGoal>) -> NodeResult<Vec<GoalChange>> {
        let changes = self.goal_manager.apply_snapshot(snapshot);
        self.rebuild_plugins();
        self.rebuild_rules()?;
        Ok(changes)
    }

    fn rebuild_plugins(&self) {
        let mut plugins = self.plugins.lock();
        let mut seen = std::collections::HashSet::new();
        for goal in self.goal_manager.current_goals() {
            let Some(sub_goal) = goal.sub_goal_for_node(&self.node_name) else {
                continue;
            };
            for spec in &sub_goal.plugins {
                let name = plugin_identity(spec);
                seen.insert(name.clone());
                plugins
                    .entry(name.clone())
                    .or_insert_with(|| Plugin::new(name, spec.clone(), goal.id.clone()));
            }
        }
        plugins.retain(|name, _| seen.contains(name));
    }

    fn rebuild_rules(&self) -> NodeResult<()> {
        let rules = self.goal_manager.all_rules();
        let evaluator = RuleEvaluator::parse(&rules).map_err(|e| NodeError::Condition(e.to_string()))?;
        *self.rule_evaluator.lock() = Some(evaluator);
        Ok(())
    }

    /// One evaluator pass: evaluate rules against the live context, apply
    /// `schedule()` transitions and `publish()` firings, and try to launch
    /// the next schedulable plugin if nothing is currently reserved.
    pub async fn tick(self: &Arc<Self>, sink: &dyn PublishSink) -> NodeResult<()> {
        let outcome = {
            let guard = self.rule_evaluator.lock();
            match guard.as_ref() {
                Some(evaluator) => evaluator.evaluate(&self.context, Utc::now().timestamp())?,
                None => return Ok(()),
            }
        };

        for publish in &outcome.publishes {
            sink.publish(&publish.topic, &publish.parameters);
        }

        for decision in &outcome.decisions {
            self.apply_decision(decision.plugin.as_str(), decision.runnable).await;
        }

        self.try_launch_next().await;
        Ok(())
    }

    async fn apply_decision(&self, plugin_name: &str, runnable: bool) {
        let transition = {
            let mut plugins = self.plugins.lock();
            let Some(plugin) = plugins.get_mut(plugin_name) else {
                return;
            };
            let previous = plugin.context_status;
            plugin.context_status = if runnable {
                ContextStatus::Runnable
            } else {
                ContextStatus::Stoppable
            };

            if previous == plugin.context_status {
                None
            } else {
                let terminate = !runnable && plugin.scheduling_status == SchedulingStatus::Running;
                Some((plugin.goal_id.clone(), terminate))
            }
        };

        let Some((goal_id, terminate)) = transition else {
            return;
        };

        if runnable {
            if let Some(plugin) = self.plugins.lock().get(plugin_name).cloned() {
                if plugin.is_schedulable() {
                    self.queue.push(plugin);
                    self.emit(EventType::PluginStatusRunnable, plugin_name, &goal_id).await;
                }
            }
        } else {
            self.queue.pop(plugin_name);
            self.emit(EventType::PluginStatusStoppable, plugin_name, &goal_id).await;
        }

        if terminate {
            if let Err(e) = self.resource_manager.terminate(plugin_name).await {
                warn!(plugin = plugin_name, error = %e, "failed to terminate stoppable running plugin");
            }
        }
    }

    async fn emit(&self, event_type: EventType, plugin_name: &str, goal_id: &str) {
        let plugin = self.plugins.lock().get(plugin_name).cloned();
        let body = match plugin {
            Some(p) => EventBody::empty().with_plugin(p).with_reason(goal_id.to_string()),
            None => EventBody::empty(),
        };
        let _ = self.events.try_send(Event::new(event_type, Utc::now(), body));
    }

    /// Launches the next schedulable plugin if the node isn't currently
    /// reserved. Spawns and tracks the `LaunchAndWatch` task; never blocks
    /// the caller on cluster I/O.
    async fn try_launch_next(self: &Arc<Self>) {
        {
            let mut reserved = self.reserved.lock();
            if *reserved {
                return;
            }
            let Some(plugin) = self.queue.pop_first() else {
                return;
            };
            *reserved = true;
            drop(reserved);

            let scheduler = Arc::clone(self);
            self.watchers
                .lock()
                .spawn(async move { scheduler.launch_and_watch(plugin).await });
        }
    }

    /// `LaunchAndWatch(plugin, notifyChannel)` per spec.md §4.6: builds and
    /// launches the workload, opens a watcher with retry/backoff, and on a
    /// terminal event returns the plugin to `Waiting`, clears `reserved`,
    /// and re-evaluates the queue.
    async fn launch_and_watch(self: Arc<Self>, mut plugin: Plugin) {
        plugin.scheduling_status = SchedulingStatus::Ready;
        self.set_plugin(plugin.clone());

        let outcome = self.launch_and_watch_inner(&plugin).await;

        plugin.scheduling_status = SchedulingStatus::Waiting;
        self.set_plugin(plugin.clone());
        *self.reserved.lock() = false;

        match outcome {
            Ok(()) => self.emit(EventType::PluginStatusDone, &plugin.name, &plugin.goal_id).await,
            Err(e) => {
                error!(plugin = plugin.name, error = %e, "plugin run ended in error");
                self.emit(EventType::PluginStatusDone, &plugin.name, &plugin.goal_id).await;
            }
        }

        self.try_launch_next().await;
    }

    async fn launch_and_watch_inner(&self, plugin: &Plugin) -> NodeResult<()> {
        let credential = self.provision_credential(&plugin.plugin_spec).await?;
        let workload = self
            .resource_manager
            .create_workload(&plugin.name, &plugin.plugin_spec, &credential)
            .await?;
        self.resource_manager.launch(&workload).await?;

        {
            let mut running = plugin.clone();
            running.scheduling_status = SchedulingStatus::Running;
            self.set_plugin(running);
        }
        self.emit(EventType::PluginStatusRunning, &plugin.name, &plugin.goal_id).await;

        self.watch_to_terminal(&plugin.name).await
    }

    async fn provision_credential(&self, spec: &PluginSpec) -> NodeResult<Credential> {
        let credential = self
            .resource_manager
            .create_credential(&spec.image_name().to_string(), &spec.image_version())
            .await?;
        self.resource_manager.register_credential(&credential).await?;
        Ok(credential)
    }

    async fn watch_to_terminal(&self, name: &str) -> NodeResult<()> {
        use tokio_stream::StreamExt;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.resource_manager.watch(name, WATCH_RETRIES).await {
                Ok(mut stream) => {
                    while let Some(event) = stream.next().await {
                        let event = event?;
                        if event.is_terminal() {
                            if event.phase == WorkloadPhase::Failed {
                                return Err(NodeError::Condition(format!(
                                    "plugin {name} workload failed"
                                )));
                            }
                            return Ok(());
                        }
                    }
                    return Ok(());
                }
                Err(e) if attempt < WATCH_RETRIES => {
                    warn!(plugin = name, attempt, error = %e, "watch attempt failed, retrying");
                    tokio::time::sleep(WATCH_BACKOFF).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn set_plugin(&self, plugin: Plugin) {
        self.plugins.lock().insert(plugin.name.clone(), plugin);
    }

    pub fn plugin(&self, name: &str) -> Option<Plugin> {
        self.plugins.lock().get(name).cloned()
    }

    pub fn is_reserved(&self) -> bool {
        *self.reserved.lock()
    }

    /// Runs the coordinator loop: a fixed evaluation tick plus whatever
    /// cancellation signal the caller supplies. Goal updates are applied
    /// out-of-band via [`NodeScheduler::apply_goals`] by whatever task owns
    /// the goal subscription (SSE stream or poll loop).
    pub async fn run(self: Arc<Self>, sink: Arc<dyn PublishSink>, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick(sink.as_ref()).await {
                        warn!(error = %e, "rule evaluation tick failed, continuing");
                    }
                }
                _ = cancel.cancelled() => {
                    info!(node = %self.node_name, "scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// Terminates every workload the resource manager can list. Used on an
    /// explicit `CleanUp()` request; ordinary shutdown leaves in-flight
    /// workloads running per spec.md §5.
    pub async fn clean_up(&self) -> NodeResult<usize> {
        let workloads = self.resource_manager.list_workloads().await?;
        let mut terminated = 0;
        for workload in workloads {
            if self.resource_manager.terminate(&workload.name).await.is_ok() {
                terminated += 1;
            }
        }
        Ok(terminated)
    }

    /// Runs one garbage-collection pass, per spec.md §4.6's 60 s default
    /// period (the caller owns the ticker; this just does the sweep).
    pub async fn garbage_collect(&self) -> NodeResult<usize> {
        Ok(self.resource_manager.garbage_collect(GC_TTL).await?)
    }
}

/// A plugin's queue/table identity. The original keys plugins by
/// `PluginSpec.Name`; specs without one fall back to the deterministic
/// workload-name scheme so distinct anonymous specs never collide.
fn plugin_identity(spec: &PluginSpec) -> String {
    spec.name.clone().unwrap_or_else(|| spec.image_name().to_string())
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
