// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kubernetes-backed `ResourceManager`: plugins compile to `batch/v1` Jobs,
//! watched and garbage-collected through the same `kube::Api` handle.
//!
//! # Module layout
//!
//! - [`workload`] — Job spec construction

mod workload;

pub use workload::{build_job, JobParams};

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use k8s_openapi::api::batch::v1::Job;
use kube::api::{Api, DeleteParams, ListParams, LogParams, PostParams};
use kube::runtime::watcher;
use kube::Client;
use tokio_stream::StreamExt;

use sg_core::PluginSpec;

use crate::broker::BrokerAdminClient;
use crate::error::{AdapterError, AdapterResult};
use crate::resource_manager::{
    Credential, ResourceManager, WatchEvent, WatchEventKind, WatchStream, Workload,
    WorkloadHandle, WorkloadPhase, WorkloadSummary,
};

/// Label applied to every workload this adapter manages, used to scope
/// `list_workloads`/`garbage_collect` to plugin jobs rather than the whole
/// namespace.
const ROLE_LABEL: &str = "role=plugin";

pub struct KubernetesResourceManager {
    client: Client,
    namespace: String,
    org: String,
    hostname_key: String,
    broker_host: String,
    broker_port: u16,
    credential_secret: Option<String>,
    broker_admin: Option<BrokerAdminClient>,
}

impl KubernetesResourceManager {
    pub async fn new(
        namespace: impl Into<String>,
        org: impl Into<String>,
        broker_host: impl Into<String>,
        broker_port: u16,
    ) -> AdapterResult<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| AdapterError::Config(format!("kube client init failed: {e}")))?;
        Ok(Self {
            client,
            namespace: namespace.into(),
            org: org.into(),
            hostname_key: "kubernetes.io/hostname".to_string(),
            broker_host: broker_host.into(),
            broker_port,
            credential_secret: None,
            broker_admin: None,
        })
    }

    pub fn with_credential_secret(mut self, secret: impl Into<String>) -> Self {
        self.credential_secret = Some(secret.into());
        self
    }

    /// Registers an admin client against the broker's management API; when
    /// unset, `register_credential` is a no-op (used in environments where
    /// the broker provisions credentials out of band).
    pub fn with_broker_admin(mut self, base_url: impl Into<String>, vhost: impl Into<String>) -> Self {
        self.broker_admin = Some(BrokerAdminClient::new(base_url, vhost));
        self
    }

    fn jobs(&self) -> Api<Job> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn pods(&self) -> Api<k8s_openapi::api::core::v1::Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }
}

fn job_phase(job: &Job) -> WorkloadPhase {
    let Some(status) = &job.status else {
        return WorkloadPhase::Pending;
    };
    if status.succeeded.unwrap_or(0) > 0 {
        WorkloadPhase::Succeeded
    } else if status.failed.unwrap_or(0) > 0 {
        WorkloadPhase::Failed
    } else if status.active.unwrap_or(0) > 0 {
        WorkloadPhase::Running
    } else {
        WorkloadPhase::Pending
    }
}

#[async_trait]
impl ResourceManager for KubernetesResourceManager {
    async fn create_workload(
        &self,
        plugin_name: &str,
        spec: &PluginSpec,
        credential: &Credential,
    ) -> AdapterResult<Workload> {
        let job_id = spec.job.clone().unwrap_or_default();
        let workload_identity = format!("{plugin_name}-{}", Utc::now().timestamp());
        let params = JobParams {
            name: plugin_name,
            job_id: &job_id,
            namespace: &self.namespace,
            org: &self.org,
            hostname_key: &self.hostname_key,
            credential_secret: self.credential_secret.as_deref(),
            workload_identity: &workload_identity,
            broker_host: &self.broker_host,
            broker_port: self.broker_port,
            data_config_map: None,
        };
        let job = build_job(spec, credential, &params);
        let spec_json = serde_json::to_value(&job)
            .map_err(|e| AdapterError::Config(format!("job not serializable: {e}")))?;
        Ok(Workload {
            name: plugin_name.to_string(),
            namespace: self.namespace.clone(),
            spec: spec_json,
        })
    }

    async fn launch(&self, workload: &Workload) -> AdapterResult<WorkloadHandle> {
        let job: Job = serde_json::from_value(workload.spec.clone())
            .map_err(|e| AdapterError::Config(format!("stored workload is not a Job: {e}")))?;
        self.jobs().create(&PostParams::default(), &job).await?;
        Ok(WorkloadHandle {
            name: workload.name.clone(),
        })
    }

    async fn watch(&self, name: &str, retries: u32) -> AdapterResult<WatchStream> {
        let api = self.jobs();
        let field_selector = format!("metadata.name={name}");
        let config = watcher::Config::default().fields(&field_selector);

        // `kube`'s watcher already reconnects on stream errors with its own
        // backoff; `retries` bounds how many consecutive stream errors the
        // caller tolerates before giving up on this handle.
        let mut remaining = retries;
        let stream = watcher(api, config).filter_map(move |event| match event {
            Ok(watcher::Event::Apply(job)) => Some(Ok(WatchEvent::new(
                WatchEventKind::Modified,
                job_phase(&job),
            ))),
            Ok(watcher::Event::InitApply(job)) => Some(Ok(WatchEvent::new(
                WatchEventKind::Added,
                job_phase(&job),
            ))),
            Ok(watcher::Event::Delete(job)) => Some(Ok(WatchEvent::new(
                WatchEventKind::Deleted,
                job_phase(&job),
            ))),
            Ok(_) => None,
            Err(e) if remaining > 0 => {
                remaining -= 1;
                Some(Err(AdapterError::Transient(e.to_string())))
            }
            Err(e) => Some(Err(AdapterError::Transient(format!(
                "watch retries exhausted: {e}"
            )))),
        });

        Ok(Box::pin(stream))
    }

    async fn terminate(&self, name: &str) -> AdapterResult<()> {
        let params = DeleteParams::background();
        match self.jobs().delete(name, &params).await {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(err)) if err.code == 404 => {
                Err(AdapterError::NotFound(name.to_string()))
            }
            Err(e) => Err(AdapterError::Kube(e)),
        }
    }

    async fn list_workloads(&self) -> AdapterResult<Vec<WorkloadSummary>> {
        let list_params = ListParams::default().labels(ROLE_LABEL);
        let jobs = self.jobs().list(&list_params).await?;
        Ok(jobs
            .items
            .into_iter()
            .map(|job| {
                let created_unix = job
                    .metadata
                    .creation_timestamp
                    .as_ref()
                    .map(|t| t.0.timestamp())
                    .unwrap_or(0);
                WorkloadSummary {
                    name: job.metadata.name.clone().unwrap_or_default(),
                    phase: job_phase(&job),
                    created_unix,
                }
            })
            .collect())
    }

    async fn get_status(&self, name: &str) -> AdapterResult<WorkloadPhase> {
        match self.jobs().get(name).await {
            Ok(job) => Ok(job_phase(&job)),
            Err(kube::Error::Api(err)) if err.code == 404 => {
                Err(AdapterError::NotFound(name.to_string()))
            }
            Err(e) => Err(AdapterError::Kube(e)),
        }
    }

    async fn get_logs(&self, name: &str, follow: bool) -> AdapterResult<crate::resource_manager::LogStream> {
        let list_params = ListParams::default().labels(&format!("job-name={name}"));
        let pods = self.pods().list(&list_params).await?;
        let pod_name = pods
            .items
            .first()
            .and_then(|p| p.metadata.name.clone())
            .ok_or_else(|| AdapterError::NotFound(format!("no pod for job {name}")))?;

        let log_params = LogParams {
            follow,
            ..Default::default()
        };
        // `log_stream` hands back an `AsyncBufRead`, not a `Stream` —
        // `ReaderStream` is the bridge between the two.
        let reader = self.pods().log_stream(&pod_name, &log_params).await?;
        let mapped = tokio_util::io::ReaderStream::new(reader).map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| AdapterError::Transient(e.to_string()))
        });
        Ok(Box::pin(mapped))
    }

    async fn create_credential(
        &self,
        plugin_name: &str,
        version: &str,
    ) -> AdapterResult<Credential> {
        Ok(crate::credential::generate_credential(plugin_name, version))
    }

    async fn register_credential(&self, credential: &Credential) -> AdapterResult<()> {
        match &self.broker_admin {
            Some(admin) => admin.register_credential(credential).await,
            None => Ok(()),
        }
    }

    async fn garbage_collect(&self, ttl: Duration) -> AdapterResult<usize> {
        let now = Utc::now().timestamp();
        let summaries = self.list_workloads().await?;
        let mut terminated = 0;
        for summary in summaries {
            if !summary.phase.is_terminal() {
                continue;
            }
            let age = now - summary.created_unix;
            if age >= ttl.as_secs() as i64 {
                self.terminate(&summary.name).await?;
                terminated += 1;
            }
        }
        Ok(terminated)
    }
}
