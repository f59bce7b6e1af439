// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster-facing adapters: the `ResourceManager` capability interface the
//! node scheduler depends on, a Kubernetes implementation (`batch/v1` Job
//! workloads), an in-memory fake for tests, and the message-broker admin
//! client used to register plugin credentials.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod broker;
mod credential;
mod error;
mod k8s;
mod resource_manager;

#[cfg(any(test, feature = "test-support"))]
mod simulate;

pub use broker::BrokerAdminClient;
pub use credential::generate_credential;
pub use error::{AdapterError, AdapterResult};
pub use k8s::{build_job, KubernetesResourceManager};
pub use resource_manager::{
    Credential, ResourceManager, WatchEvent, WatchEventKind, Workload, WorkloadHandle,
    WorkloadPhase, WorkloadSummary,
};

#[cfg(any(test, feature = "test-support"))]
pub use simulate::SimulateResourceManager;
