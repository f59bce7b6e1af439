// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PluginSpec: the immutable description of a single containerized workload
//! within a [`crate::job::Job`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{SgError, SgResult};
use crate::hash::stable_hash8;

/// A plugin (containerized workload) requested by a job.
///
/// Immutable once attached to a [`crate::plugin::Plugin`] instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    /// `domain/name:version` image reference.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(default)]
    pub privileged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    /// Overrides the version component parsed from `image`'s tag, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub develop_mode: bool,
    /// Opaque data-shim descriptors materialized into a sidecar config mount
    /// when non-empty. Schema is owned by the shim consumer, not this crate.
    #[serde(default)]
    pub data_shims: Vec<serde_json::Value>,
}

impl PluginSpec {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            name: None,
            args: Vec::new(),
            selector: BTreeMap::new(),
            node: None,
            job: None,
            privileged: false,
            entrypoint: None,
            version: None,
            develop_mode: false,
            data_shims: Vec::new(),
        }
    }

    /// The image name component: the last path segment, with any registry
    /// domain and version tag stripped.
    pub fn image_name(&self) -> &str {
        let without_tag = self.image.split(':').next().unwrap_or(&self.image);
        without_tag.rsplit('/').next().unwrap_or(without_tag)
    }

    /// The effective version: the explicit `version` field, falling back to
    /// the image reference's tag.
    pub fn image_version(&self) -> String {
        if let Some(v) = &self.version {
            return v.clone();
        }
        self.image
            .rsplit_once(':')
            .map(|(_, v)| v.to_string())
            .unwrap_or_default()
    }

    /// Deterministic sha8 over the canonical JSON encoding of this spec.
    /// `serde_json` serializes maps via `BTreeMap` ordering by default, so
    /// field/key order in the source does not affect the result.
    pub fn spec_hash8(&self) -> SgResult<String> {
        let canonical = serde_json::to_string(self)
            .map_err(|e| SgError::fatal(format!("plugin spec not serializable: {e}")))?;
        Ok(stable_hash8(&[canonical.as_str()]))
    }

    /// Deterministic workload name.
    ///
    /// A spec with an explicit `name` yields `<name>-<unix_seconds>`, where
    /// `name` must match `^[a-z0-9-]+$`. A spec with no `name` yields
    /// `<image-name>-<version-dots-dashed>-<sha8(spec-json)>`, stable across
    /// processes and hosts for the same spec contents.
    pub fn workload_name(&self, now_unix: i64) -> SgResult<String> {
        match &self.name {
            Some(name) => {
                if !is_valid_workload_name(name) {
                    return Err(SgError::validation(format!(
                        "plugin spec name {name:?} must match ^[a-z0-9-]+$"
                    )));
                }
                Ok(format!("{name}-{now_unix}"))
            }
            None => {
                let version = self.image_version().replace('.', "-");
                let hash = self.spec_hash8()?;
                Ok(format!("{}-{}-{}", self.image_name(), version, hash))
            }
        }
    }
}

fn is_valid_workload_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct PluginSpecBuilder => PluginSpec {
        into { image: String = "reg.io/plugin-test:1.0.0" }
        option { name: String = None }
        set { args: Vec<String> = Vec::new() }
        set { selector: BTreeMap<String, String> = BTreeMap::new() }
        option { node: String = None }
        option { job: String = None }
        set { privileged: bool = false }
        option { entrypoint: String = None }
        option { version: String = None }
        set { develop_mode: bool = false }
        set { data_shims: Vec<serde_json::Value> = Vec::new() }
    }
}

#[cfg(test)]
#[path = "plugin_spec_tests.rs"]
mod tests;
