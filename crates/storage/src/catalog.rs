// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node and plugin catalog loaders: `<dataDir>/nodes/*.json` and
//! `<dataDir>/plugins/*.json`. Malformed files are logged and skipped
//! rather than failing startup.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use sg_core::{NodeManifest, PluginManifest};
use tracing::warn;

pub fn load_node_manifests(data_dir: &Path) -> Vec<NodeManifest> {
    load_json_dir(&data_dir.join("nodes"))
}

pub fn load_plugin_manifests(data_dir: &Path) -> Vec<PluginManifest> {
    load_json_dir(&data_dir.join("plugins"))
}

fn load_json_dir<T: DeserializeOwned>(dir: &Path) -> Vec<T> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %dir.display(), error = %err, "catalog directory unreadable, skipping");
            return Vec::new();
        }
    };

    let mut items = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match parse_file::<T>(&path) {
            Ok(item) => items.push(item),
            Err(err) => warn!(file = %path.display(), error = %err, "skipping malformed catalog file"),
        }
    }
    items
}

fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
