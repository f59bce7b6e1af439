// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry point for the Node Scheduler binary: builds the Kubernetes
//! resource manager, polls the Cloud Scheduler for this node's goal
//! snapshot, and runs the rule-evaluator tick loop alongside a periodic
//! garbage-collection sweep until terminated.

use std::process::ExitCode;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use sg_adapters::KubernetesResourceManager;
use sg_node::{config, ContextStore, GoalSource, NodeGoalManager, NodeScheduler, PluginQueue};
use sg_node::scheduler::TracingPublishSink;

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already initialized");
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "sg-node exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let node_name =
        config::node_name().ok_or_else(|| anyhow::anyhow!("SG_NODE_NAME must be set"))?;
    let cloud_url =
        config::cloud_url().ok_or_else(|| anyhow::anyhow!("SG_CLOUD_URL must be set"))?;

    if let Some(kubeconfig) = config::kubeconfig_path() {
        std::env::set_var("KUBECONFIG", kubeconfig);
    }

    let mut resource_manager = KubernetesResourceManager::new(
        config::namespace(),
        config::org_label(),
        config::broker_host(),
        config::broker_port(),
    )
    .await?;
    if let Some(broker_url) = config::broker_url() {
        resource_manager = resource_manager.with_broker_admin(broker_url, config::broker_vhost());
    }
    let resource_manager = Arc::new(resource_manager);

    let goal_manager = Arc::new(NodeGoalManager::new(node_name.clone()));
    let context = Arc::new(ContextStore::new());
    let queue = Arc::new(PluginQueue::new());

    let (scheduler, mut events) =
        NodeScheduler::new(node_name.clone(), goal_manager, context, queue, resource_manager);

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::debug!(?event, "scheduler event");
        }
    });

    let goal_source = GoalSource::new(cloud_url, node_name.clone(), config::auth_token());
    let cancel = CancellationToken::new();

    let goal_poll = {
        let scheduler = Arc::clone(&scheduler);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config::goal_poll_interval());
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match goal_source.fetch().await {
                            Ok(snapshot) => {
                                if let Err(e) = scheduler.apply_goals(snapshot) {
                                    tracing::warn!(error = %e, "failed to apply goal snapshot");
                                }
                            }
                            Err(e) => tracing::warn!(error = %e, "failed to fetch goal snapshot"),
                        }
                    }
                    _ = cancel.cancelled() => break,
                }
            }
        })
    };

    let gc_sweep = {
        let scheduler = Arc::clone(&scheduler);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config::gc_interval());
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = scheduler.garbage_collect().await {
                            tracing::warn!(error = %e, "garbage collection sweep failed");
                        }
                    }
                    _ = cancel.cancelled() => break,
                }
            }
        })
    };

    let scheduler_loop = {
        let scheduler = Arc::clone(&scheduler);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            scheduler.run(Arc::new(TracingPublishSink), cancel).await;
        })
    };

    tracing::info!(node = %node_name, "sg-node starting");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    cancel.cancel();
    let _ = scheduler_loop.await;
    let _ = goal_poll.await;
    let _ = gc_sweep.await;
    Ok(())
}
