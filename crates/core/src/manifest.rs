// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static catalog entries loaded from the data directory at startup:
//! `NodeManifest` (`<dataDir>/nodes/*.json`) and `PluginManifest`
//! (`<dataDir>/plugins/*.json`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A known edge node and the tags/capabilities it advertises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeManifest {
    pub name: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
}

impl NodeManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeSet::new(),
            capabilities: BTreeSet::new(),
        }
    }

    /// Every requested tag must case-insensitively substring-match at least
    /// one of the node's own tags.
    pub fn matches_tags(&self, requested: &[String]) -> bool {
        requested.iter().all(|req| {
            let req_lower = req.to_lowercase();
            self.tags
                .iter()
                .any(|t| t.to_lowercase().contains(&req_lower))
        })
    }
}

/// A known plugin image and the nodes it is declared available on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub image: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub nodes: BTreeSet<String>,
}

impl PluginManifest {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            tags: BTreeSet::new(),
            nodes: BTreeSet::new(),
        }
    }

    pub fn available_on(&self, node: &str) -> bool {
        self.nodes.iter().any(|n| n.eq_ignore_ascii_case(node))
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
