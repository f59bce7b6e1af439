// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The capability interface the node scheduler depends on to create,
//! launch, watch, and tear down plugin workloads on a cluster, plus
//! credential provisioning with the message broker.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_stream::Stream;

use crate::error::AdapterResult;

/// Terminal/non-terminal lifecycle phase of a launched workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkloadPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl WorkloadPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkloadPhase::Succeeded | WorkloadPhase::Failed)
    }
}

/// The kind of change a watch stream reports, mirroring the cluster's own
/// watch semantics (Added/Modified/Deleted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchEventKind {
    Added,
    Modified,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub phase: WorkloadPhase,
}

impl WatchEvent {
    pub fn new(kind: WatchEventKind, phase: WorkloadPhase) -> Self {
        Self { kind, phase }
    }

    /// Whether this event closes out a run: a terminal phase, or outright
    /// removal from the cluster.
    pub fn is_terminal(&self) -> bool {
        self.kind == WatchEventKind::Deleted || self.phase.is_terminal()
    }
}

/// A workload built and ready to launch. The contained `spec` is the
/// orchestrator's native object model, carried opaquely so this type stays
/// adapter-agnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workload {
    pub name: String,
    pub namespace: String,
    pub spec: serde_json::Value,
}

/// Handle to a launched workload, returned by `launch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadHandle {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSummary {
    pub name: String,
    pub phase: WorkloadPhase,
    pub created_unix: i64,
}

/// Broker principal minted by `create_credential` and pushed to the broker
/// by `register_credential`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub user: String,
    pub pass: String,
}

pub type WatchStream = Pin<Box<dyn Stream<Item = AdapterResult<WatchEvent>> + Send>>;
pub type LogStream = Pin<Box<dyn Stream<Item = AdapterResult<Vec<u8>>> + Send>>;

/// Cluster-facing capability interface. The node scheduler depends only on
/// this trait; `k8s::KubernetesResourceManager` and `simulate::SimulateResourceManager`
/// are its two implementations.
#[async_trait]
pub trait ResourceManager: Send + Sync {
    async fn create_workload(
        &self,
        plugin_name: &str,
        spec: &sg_core::PluginSpec,
        credential: &Credential,
    ) -> AdapterResult<Workload>;

    async fn launch(&self, workload: &Workload) -> AdapterResult<WorkloadHandle>;

    async fn watch(&self, name: &str, retries: u32) -> AdapterResult<WatchStream>;

    async fn terminate(&self, name: &str) -> AdapterResult<()>;

    async fn list_workloads(&self) -> AdapterResult<Vec<WorkloadSummary>>;

    async fn get_status(&self, name: &str) -> AdapterResult<WorkloadPhase>;

    async fn get_logs(&self, name: &str, follow: bool) -> AdapterResult<LogStream>;

    async fn create_credential(
        &self,
        plugin_name: &str,
        version: &str,
    ) -> AdapterResult<Credential>;

    async fn register_credential(&self, credential: &Credential) -> AdapterResult<()>;

    /// Terminates every workload in a terminal phase older than `ttl`.
    /// Returns the number of workloads terminated.
    async fn garbage_collect(&self, ttl: Duration) -> AdapterResult<usize>;
}

#[cfg(test)]
#[path = "resource_manager_tests.rs"]
mod tests;
