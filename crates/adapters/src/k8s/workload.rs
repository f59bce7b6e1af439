// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workload spec construction: a plugin compiles to a single run-to-completion
//! `batch/v1` Job (never a Deployment/Pod directly — plugins terminate).

use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{
    Container, EmptyDirVolumeSource, EnvVar, EnvVarSource, HostPathVolumeSource,
    PodSpec, PodTemplateSpec, SecretKeySelector, SecretVolumeSource, SecurityContext, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use sg_core::PluginSpec;

use crate::resource_manager::Credential;

const UPLOADS_ROOT: &str = "/media/plugin-data/uploads";
const BACKOFF_LIMIT: i32 = 0;
const TTL_SECONDS_AFTER_FINISHED: i32 = 600;

/// Parameters needed to build a plugin's Job object, beyond what's already
/// on the `PluginSpec` itself.
pub struct JobParams<'a> {
    pub name: &'a str,
    pub job_id: &'a str,
    pub namespace: &'a str,
    pub org: &'a str,
    pub hostname_key: &'a str,
    pub credential_secret: Option<&'a str>,
    pub workload_identity: &'a str,
    pub broker_host: &'a str,
    pub broker_port: u16,
    pub data_config_map: Option<&'a str>,
}

/// Builds the `batch/v1::Job` for a plugin. Mirrors §4.6's workload build
/// rules: labels, node selector, security, environment, volumes, and the
/// run-to-completion restart policy.
pub fn build_job(spec: &PluginSpec, credential: &Credential, params: &JobParams<'_>) -> Job {
    let mut labels = BTreeMap::new();
    labels.insert("app".to_string(), params.name.to_string());
    if !spec.develop_mode {
        labels.insert("role".to_string(), "plugin".to_string());
        labels.insert(format!("{}/role", params.org), "plugin".to_string());
    }
    labels.insert(format!("{}/plugin-job", params.org), params.job_id.to_string());
    labels.insert(format!("{}/plugin-task", params.org), params.name.to_string());

    let mut node_selector = spec.selector.clone();
    if let Some(node) = &spec.node {
        node_selector.insert(params.hostname_key.to_string(), node.clone());
    }

    let version = spec.image_version();
    let mut volumes = vec![Volume {
        name: "uploads".to_string(),
        host_path: Some(HostPathVolumeSource {
            path: format!("{UPLOADS_ROOT}/{}/{version}", params.name),
            type_: Some("DirectoryOrCreate".to_string()),
        }),
        ..Default::default()
    }];
    let mut volume_mounts = vec![VolumeMount {
        name: "uploads".to_string(),
        mount_path: "/run/plugin/uploads".to_string(),
        ..Default::default()
    }];

    if let Some(config_map) = params.data_config_map {
        volumes.push(Volume {
            name: "data-config".to_string(),
            config_map: Some(k8s_openapi::api::core::v1::ConfigMapVolumeSource {
                name: config_map.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        });
        volume_mounts.push(VolumeMount {
            name: "data-config".to_string(),
            mount_path: "/run/plugin/data-config.json".to_string(),
            sub_path: Some("data-config.json".to_string()),
            ..Default::default()
        });
    } else {
        volumes.push(Volume {
            name: "empty-data-config".to_string(),
            empty_dir: Some(EmptyDirVolumeSource::default()),
            ..Default::default()
        });
    }

    let mut env = vec![
        env_var("PLUGIN_NAME", &format!("{}:{}", params.name, version)),
        env_var("PLUGIN_VERSION", &version),
        env_var("PLUGIN_USERNAME", &credential.user),
        env_var("PLUGIN_HOST", params.broker_host),
        env_var("PLUGIN_PORT", &params.broker_port.to_string()),
        env_var("PLUGIN_WORKLOAD_IDENTITY", params.workload_identity),
    ];
    match params.credential_secret {
        Some(secret_name) => env.push(EnvVar {
            name: "PLUGIN_PASSWORD".to_string(),
            value_from: Some(EnvVarSource {
                secret_key_ref: Some(SecretKeySelector {
                    name: secret_name.to_string(),
                    key: "password".to_string(),
                    optional: Some(false),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
        None => env.push(env_var("PLUGIN_PASSWORD", &credential.pass)),
    }

    if let Some(entrypoint) = &spec.entrypoint {
        env.push(env_var("PLUGIN_ENTRYPOINT", entrypoint));
    }

    let container = Container {
        name: params.name.to_string(),
        image: Some(spec.image.clone()),
        args: if spec.args.is_empty() {
            None
        } else {
            Some(spec.args.clone())
        },
        env: Some(env),
        volume_mounts: Some(volume_mounts),
        security_context: spec.privileged.then(|| SecurityContext {
            privileged: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };

    Job {
        metadata: ObjectMeta {
            name: Some(params.name.to_string()),
            namespace: Some(params.namespace.to_string()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(JobSpec {
            backoff_limit: Some(BACKOFF_LIMIT),
            ttl_seconds_after_finished: Some(TTL_SECONDS_AFTER_FINISHED),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    volumes: Some(volumes),
                    restart_policy: Some("Never".to_string()),
                    node_selector: if node_selector.is_empty() {
                        None
                    } else {
                        Some(node_selector)
                    },
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        status: None,
    }
}

fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "workload_tests.rs"]
mod tests;
