// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment-variable access for the node-side binary,
//! matching the teacher daemon's `env.rs` shape: one function per setting,
//! no config-file framework.

use std::time::Duration;

/// This node's manifest name, used to key its goal subscription and its
/// SubGoal lookup within every received ScienceGoal.
pub fn node_name() -> Option<String> {
    std::env::var("SG_NODE_NAME").ok().filter(|s| !s.is_empty())
}

/// Base URL of the Cloud Scheduler's HTTP API (e.g. `https://cloud.internal`).
pub fn cloud_url() -> Option<String> {
    std::env::var("SG_CLOUD_URL").ok().filter(|s| !s.is_empty())
}

/// Bearer token presented on requests that require authentication.
pub fn auth_token() -> Option<String> {
    std::env::var("SG_AUTH_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Path to the kubeconfig used to build the cluster client. `None` means
/// use the in-cluster service-account config.
pub fn kubeconfig_path() -> Option<String> {
    std::env::var("SG_KUBECONFIG").ok().filter(|s| !s.is_empty())
}

/// Kubernetes namespace plugin workloads are created in.
pub fn namespace() -> String {
    std::env::var("SG_NAMESPACE").unwrap_or_else(|_| "default".to_string())
}

/// Message-broker admin API base URL, used to register plugin credentials.
pub fn broker_url() -> Option<String> {
    std::env::var("SG_BROKER_URL").ok().filter(|s| !s.is_empty())
}

/// Message-broker data-plane hostname, handed to plugin containers so they
/// can connect directly (distinct from `broker_url`'s admin API).
pub fn broker_host() -> String {
    std::env::var("SG_BROKER_HOST").unwrap_or_else(|_| "broker".to_string())
}

/// Message-broker vhost plugin credentials are scoped to.
pub fn broker_vhost() -> String {
    std::env::var("SG_BROKER_VHOST").unwrap_or_else(|_| "/".to_string())
}

/// Message-broker data-plane port, handed to plugin containers as an
/// environment variable; the admin API itself is reached through
/// `broker_url`.
pub fn broker_port() -> u16 {
    std::env::var("SG_BROKER_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5672)
}

/// Label prefix used on every workload this node creates (`<org>/plugin-job`,
/// `<org>/role`, ...).
pub fn org_label() -> String {
    std::env::var("SG_ORG").unwrap_or_else(|_| "sg".to_string())
}

/// Host-path root plugin upload directories are created under.
pub fn uploads_root() -> String {
    std::env::var("SG_UPLOADS_ROOT").unwrap_or_else(|_| "/data/uploads".to_string())
}

/// Rule-evaluator tick interval override (default 1 s, per spec.md §4.4).
pub fn tick_interval() -> Duration {
    std::env::var("SG_TICK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(1))
}

/// Garbage-collector sweep period override (default 60 s, per spec.md §4.6).
pub fn gc_interval() -> Duration {
    std::env::var("SG_GC_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(60))
}

/// How often the node polls the Cloud Scheduler for its goal snapshot
/// (default 10 s; independent of the rule-evaluator tick).
pub fn goal_poll_interval() -> Duration {
    std::env::var("SG_GOAL_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(10))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
