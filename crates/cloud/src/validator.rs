// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiles a [`Job`] into a [`ScienceGoal`] against the node/plugin
//! catalogs, per §4.1: node selection, plugin lookup, node/plugin
//! cross-check, rule parsing, and SubGoal construction.

use sg_core::{
    Job, NodeManifest, PluginManifest, PluginSpec, ScienceGoal, ScienceRule, SgError, SubGoal,
    ValidationIssue,
};

/// Loaded catalogs plus `Validate`. Catalogs are read once at startup via
/// `sg-storage::catalog` and held for the process lifetime; a restart is
/// required to pick up new manifests (matching the original's `LoadDatabase`
/// being a one-shot startup call).
pub struct Validator {
    nodes: Vec<NodeManifest>,
    plugins: Vec<PluginManifest>,
}

impl Validator {
    pub fn new(nodes: Vec<NodeManifest>, plugins: Vec<PluginManifest>) -> Self {
        Self { nodes, plugins }
    }

    /// `Validate(job) -> (goal, errors[])`. Never fails outright: fatal
    /// problems (empty target set, missing plugin, rule parse failure) are
    /// returned as a single-element error list with no goal; non-fatal
    /// problems (node/plugin unavailable) are warnings that drop just that
    /// pairing and still produce a goal.
    pub fn validate(&self, job: &Job) -> (Option<ScienceGoal>, Vec<ValidationIssue>) {
        let mut errors = Vec::new();

        let target_nodes = self.target_nodes(job);
        if target_nodes.is_empty() {
            errors.push(ValidationIssue::new(
                "nodes",
                "job matches no nodes by explicit name or tag",
            ));
            return (None, errors);
        }

        let mut resolved_plugins = Vec::with_capacity(job.plugins.len());
        for spec in &job.plugins {
            match self.lookup_plugin(spec) {
                Some(manifest) => resolved_plugins.push((spec.clone(), manifest)),
                None => {
                    errors.push(ValidationIssue::new(
                        "plugins",
                        format!("no plugin manifest declares image {:?}", spec.image),
                    ));
                    return (None, errors);
                }
            }
        }

        let mut rules = Vec::with_capacity(job.science_rules.len());
        for raw in &job.science_rules {
            match ScienceRule::parse(raw) {
                Ok(rule) => rules.push(rule),
                Err(SgError::Validation(msg)) => {
                    errors.push(ValidationIssue::new("science_rules", msg));
                    return (None, errors);
                }
                Err(other) => {
                    errors.push(ValidationIssue::new("science_rules", other.to_string()));
                    return (None, errors);
                }
            }
        }
        let rule_strings: Vec<String> = rules.iter().map(|r| r.raw.clone()).collect();

        let mut sub_goals = Vec::new();
        for node in &target_nodes {
            let mut sub_goal = SubGoal::new(node.name.clone());
            sub_goal.rules = rule_strings.clone();
            sub_goal.statements = job.success_criteria.clone();

            for (spec, manifest) in &resolved_plugins {
                if manifest.available_on(&node.name) {
                    sub_goal.plugins.push(spec.clone());
                } else {
                    errors.push(ValidationIssue::new(
                        "plugins",
                        format!(
                            "plugin {:?} is not declared available on node {:?}",
                            manifest.image, node.name
                        ),
                    ));
                }
            }
            sub_goals.push(sub_goal);
        }

        let mut node_names: Vec<String> = sub_goals.iter().map(|sg| sg.node.clone()).collect();
        node_names.sort_unstable();
        let id = ScienceGoal::stable_id(&job.id.to_string(), &node_names);
        let goal = ScienceGoal::new(id, job.name.clone(), sub_goals);

        (Some(goal), errors)
    }

    fn target_nodes(&self, job: &Job) -> Vec<&NodeManifest> {
        let mut seen = std::collections::BTreeSet::new();
        let mut targets = Vec::new();

        for explicit in &job.nodes {
            if let Some(node) = self
                .nodes
                .iter()
                .find(|n| n.name.eq_ignore_ascii_case(explicit))
            {
                if seen.insert(node.name.clone()) {
                    targets.push(node);
                }
            }
        }

        if !job.node_tags.is_empty() {
            for node in &self.nodes {
                if node.matches_tags(&job.node_tags) && seen.insert(node.name.clone()) {
                    targets.push(node);
                }
            }
        }

        targets
    }

    fn lookup_plugin(&self, spec: &PluginSpec) -> Option<&PluginManifest> {
        self.plugins.iter().find(|p| p.image == spec.image)
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
