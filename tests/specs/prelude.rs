// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the root-level integration suite: a real
//! `sg-cloud` HTTP server bound to an ephemeral port, backed by a
//! tempdir-housed sled database, and a real `sg-node` scheduler wired to
//! the in-memory `SimulateResourceManager` fake. Each scenario gets its
//! own tempdir and port; nothing here is shared across tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use sg_adapters::SimulateResourceManager;
use sg_cloud::{router, AppState, FakeAuthenticator, GoalManager, Notifier, Validator};
use sg_core::{NodeManifest, PluginManifest};
use sg_node::{ContextStore, NodeGoalManager, NodeScheduler, PluginQueue};
use sg_storage::JobStore;
use tokio::sync::mpsc;

/// A running `sg-cloud` instance plus the pieces needed to drive requests
/// against it and keep its backing resources alive for the test's
/// duration.
pub struct CloudHarness {
    pub base_url: String,
    pub client: reqwest::Client,
    _dir: tempfile::TempDir,
}

impl CloudHarness {
    /// Boots a server with the given node/plugin catalogs already loaded.
    pub async fn start(nodes: Vec<NodeManifest>, plugins: Vec<PluginManifest>) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = sled::open(dir.path().join("sg.db")).expect("open sled db");
        let store = JobStore::open(&db).expect("open job store");
        let validator = Validator::new(nodes, plugins);
        let goal_manager = Arc::new(GoalManager::new(store, validator, Arc::new(Notifier::new())));
        let state = AppState::new(goal_manager, Arc::new(FakeAuthenticator));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr: SocketAddr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.ok();
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A GET request with the given bearer token attached.
    pub async fn get_auth(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("request")
    }

    /// A POST request with a JSON body and the given bearer token attached.
    pub async fn post_auth<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("request")
    }
}

/// A node scheduler wired to the in-memory resource manager fake, plus
/// its event receiver, ready to receive goal snapshots and drive ticks.
pub struct NodeHarness {
    pub scheduler: Arc<NodeScheduler<SimulateResourceManager>>,
    pub context: Arc<ContextStore>,
    pub resource_manager: Arc<SimulateResourceManager>,
    pub events: mpsc::Receiver<sg_core::Event>,
}

impl NodeHarness {
    pub fn new(node_name: &str) -> Self {
        let goal_manager = Arc::new(NodeGoalManager::new(node_name));
        let context = Arc::new(ContextStore::new());
        let queue = Arc::new(PluginQueue::new());
        let resource_manager = Arc::new(SimulateResourceManager::new());

        let (scheduler, events) = NodeScheduler::new(
            node_name,
            goal_manager,
            Arc::clone(&context),
            queue,
            Arc::clone(&resource_manager),
        );

        Self {
            scheduler,
            context,
            resource_manager,
            events,
        }
    }

    /// Spins the tokio scheduler until `is_reserved()` clears or `tries`
    /// yields pass, whichever comes first — used after a `tick()` to let a
    /// spawned `LaunchAndWatch` task run to completion against the
    /// instantly-succeeding simulated resource manager.
    pub async fn drain_reserved(&self, tries: usize) {
        for _ in 0..tries {
            if !self.scheduler.is_reserved() {
                return;
            }
            tokio::task::yield_now().await;
        }
    }
}

pub struct SilentSink;

impl sg_node::scheduler::PublishSink for SilentSink {
    fn publish(&self, _topic: &str, _parameters: &std::collections::BTreeMap<String, String>) {}
}
