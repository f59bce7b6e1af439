// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry point for the Cloud Scheduler binary: wires together the embedded
//! job store, node/plugin catalogs, authenticator, and HTTP API, then serves
//! until terminated.

use std::process::ExitCode;
use std::sync::Arc;

use sg_cloud::{config, router, AppState, GoalManager, HttpAuthenticator, Notifier, Validator};
use sg_storage::{load_node_manifests, load_plugin_manifests, open_db, JobStore};
use tracing_subscriber::EnvFilter;

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
            tracing::error!(error = %err, "sg-cloud exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let data_dir = config::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let db = open_db(&data_dir)?;
    let store = JobStore::open(&db)?;
    let nodes = load_node_manifests(&data_dir);
    let plugins = load_plugin_manifests(&data_dir);
    tracing::info!(nodes = nodes.len(), plugins = plugins.len(), "catalogs loaded");

    let validator = Validator::new(nodes, plugins);
    let notifier = Arc::new(Notifier::new());
    let goal_manager = Arc::new(GoalManager::new(store, validator, notifier));
    goal_manager.load_from_store()?;

    let auth_url =
        config::auth_service_url().ok_or_else(|| anyhow::anyhow!("SG_AUTH_SERVICE_URL must be set"))?;
    let authenticator = Arc::new(HttpAuthenticator::new(auth_url));

    let state = AppState::new(goal_manager, authenticator);
    let app = router(state);

    let listen_addr = config::listen_addr();
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(addr = %listen_addr, "sg-cloud listening");
    axum::serve(listener, app).await?;
    Ok(())
}
