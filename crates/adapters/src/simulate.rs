// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `ResourceManager` fake for tests that exercise the node
//! scheduler without a cluster. Workloads "run" instantly and stay
//! `Succeeded` until garbage-collected.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sg_core::PluginSpec;

use crate::error::{AdapterError, AdapterResult};
use crate::resource_manager::{
    Credential, ResourceManager, WatchEvent, WatchEventKind, WatchStream, Workload,
    WorkloadHandle, WorkloadPhase, WorkloadSummary,
};

struct SimulatedWorkload {
    phase: WorkloadPhase,
    created_unix: i64,
}

/// Test double keeping launched workloads in a map, guarded by a single
/// mutex (mirroring the real adapters' single-lock shared-state shape).
pub struct SimulateResourceManager {
    workloads: Mutex<HashMap<String, SimulatedWorkload>>,
    clock_unix: Mutex<i64>,
    fail_on_launch: Mutex<HashSet<String>>,
}

impl SimulateResourceManager {
    pub fn new() -> Self {
        Self {
            workloads: Mutex::new(HashMap::new()),
            clock_unix: Mutex::new(0),
            fail_on_launch: Mutex::new(HashSet::new()),
        }
    }

    /// Arranges for the next `launch` of a workload named `name` to come up
    /// `Failed` instead of `Succeeded`, for tests exercising the watcher's
    /// failure-recovery path without a real flaky container.
    pub fn fail_on_launch(&self, name: &str) {
        self.fail_on_launch.lock().insert(name.to_string());
    }

    /// Advances the fake's internal clock, used by tests to age workloads
    /// past a GC TTL without sleeping.
    pub fn advance_clock(&self, seconds: i64) {
        *self.clock_unix.lock() += seconds;
    }

    /// Marks a previously launched workload `Failed`, simulating a
    /// container crash for watcher/GC tests.
    pub fn fail(&self, name: &str) {
        if let Some(w) = self.workloads.lock().get_mut(name) {
            w.phase = WorkloadPhase::Failed;
        }
    }
}

impl Default for SimulateResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceManager for SimulateResourceManager {
    async fn create_workload(
        &self,
        plugin_name: &str,
        _spec: &PluginSpec,
        _credential: &Credential,
    ) -> AdapterResult<Workload> {
        Ok(Workload {
            name: plugin_name.to_string(),
            namespace: "simulated".to_string(),
            spec: serde_json::json!({ "name": plugin_name }),
        })
    }

    async fn launch(&self, workload: &Workload) -> AdapterResult<WorkloadHandle> {
        let now = *self.clock_unix.lock();
        let phase = if self.fail_on_launch.lock().remove(&workload.name) {
            WorkloadPhase::Failed
        } else {
            WorkloadPhase::Succeeded
        };
        self.workloads.lock().insert(
            workload.name.clone(),
            SimulatedWorkload {
                phase,
                created_unix: now,
            },
        );
        Ok(WorkloadHandle {
            name: workload.name.clone(),
        })
    }

    async fn watch(&self, name: &str, _retries: u32) -> AdapterResult<WatchStream> {
        let phase = self
            .workloads
            .lock()
            .get(name)
            .map(|w| w.phase)
            .ok_or_else(|| AdapterError::NotFound(name.to_string()))?;
        let event = WatchEvent::new(WatchEventKind::Modified, phase);
        Ok(Box::pin(tokio_stream::once(Ok(event))))
    }

    async fn terminate(&self, name: &str) -> AdapterResult<()> {
        self.workloads
            .lock()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AdapterError::NotFound(name.to_string()))
    }

    async fn list_workloads(&self) -> AdapterResult<Vec<WorkloadSummary>> {
        Ok(self
            .workloads
            .lock()
            .iter()
            .map(|(name, w)| WorkloadSummary {
                name: name.clone(),
                phase: w.phase,
                created_unix: w.created_unix,
            })
            .collect())
    }

    async fn get_status(&self, name: &str) -> AdapterResult<WorkloadPhase> {
        self.workloads
            .lock()
            .get(name)
            .map(|w| w.phase)
            .ok_or_else(|| AdapterError::NotFound(name.to_string()))
    }

    async fn get_logs(
        &self,
        name: &str,
        _follow: bool,
    ) -> AdapterResult<crate::resource_manager::LogStream> {
        if !self.workloads.lock().contains_key(name) {
            return Err(AdapterError::NotFound(name.to_string()));
        }
        let line = format!("simulated log for {name}\n").into_bytes();
        Ok(Box::pin(tokio_stream::once(Ok(line))))
    }

    async fn create_credential(
        &self,
        plugin_name: &str,
        version: &str,
    ) -> AdapterResult<Credential> {
        Ok(crate::credential::generate_credential(plugin_name, version))
    }

    async fn register_credential(&self, _credential: &Credential) -> AdapterResult<()> {
        Ok(())
    }

    async fn garbage_collect(&self, ttl: Duration) -> AdapterResult<usize> {
        let now = *self.clock_unix.lock();
        let ttl_secs = ttl.as_secs() as i64;
        let expired: Vec<String> = self
            .workloads
            .lock()
            .iter()
            .filter(|(_, w)| w.phase.is_terminal() && now - w.created_unix >= ttl_secs)
            .map(|(name, _)| name.clone())
            .collect();
        let count = expired.len();
        let mut workloads = self.workloads.lock();
        for name in expired {
            workloads.remove(&name);
        }
        Ok(count)
    }
}

#[cfg(test)]
#[path = "simulate_tests.rs"]
mod tests;
