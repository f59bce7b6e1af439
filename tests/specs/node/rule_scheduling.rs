// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule-evaluator-driven scheduling against a goal compiled by the real
//! cloud-side `Validator`, per spec.md §4.1/§4.5.

use sg_core::{ContextStatus, NodeManifest, PluginManifest, PluginSpec, SchedulingStatus};
use sg_core::{Job, PluginSpecBuilder};

use crate::prelude::{NodeHarness, SilentSink};

/// Compiles a single-node, single-plugin goal through the real cloud-side
/// `Validator`, exercising node-scheduler tests against the same goal shape
/// the HTTP API actually distributes rather than a hand-assembled one.
fn goal_with_rules(node: &str, plugin_image: &str, rules: &[&str]) -> sg_core::ScienceGoal {
    let node_manifest = NodeManifest::new(node);
    let mut plugin_manifest = PluginManifest::new(plugin_image);
    plugin_manifest.nodes.insert(node.to_string());
    let validator = sg_cloud::Validator::new(vec![node_manifest], vec![plugin_manifest]);

    let mut job = Job::new("imagenet-job", "alice");
    job.nodes = vec![node.to_string()];
    job.plugins = vec![PluginSpec::new(plugin_image)];
    job.science_rules = rules.iter().map(|r| r.to_string()).collect();

    let (goal, errors) = validator.validate(&job);
    assert!(errors.is_empty(), "unexpected validation errors: {errors:?}");
    goal.expect("goal compiled")
}

#[tokio::test]
async fn stays_stoppable_until_the_condition_is_met_then_launches_once() {
    let harness = NodeHarness::new("edge-01");
    let goal = goal_with_rules(
        "edge-01",
        "reg.io/imagenet:1.0",
        &["schedule(imagenet): v > 3"],
    );
    harness.scheduler.apply_goals(vec![goal]).unwrap();

    harness.scheduler.tick(&SilentSink).await.unwrap();
    let plugin = harness.scheduler.plugin("imagenet").expect("plugin tracked");
    assert_eq!(plugin.context_status, ContextStatus::Stoppable);
    assert_eq!(plugin.scheduling_status, SchedulingStatus::Waiting);

    harness.context.set("v", sg_node::ContextValue::from(5.0));
    harness.scheduler.tick(&SilentSink).await.unwrap();
    harness.drain_reserved(200).await;

    assert!(!harness.scheduler.is_reserved());
    assert_eq!(
        harness.scheduler.plugin("imagenet").unwrap().scheduling_status,
        SchedulingStatus::Waiting
    );
}

#[tokio::test]
async fn a_set_rule_assigns_context_and_unblocks_a_dependent_schedule_rule() {
    let harness = NodeHarness::new("edge-01");
    let goal = goal_with_rules(
        "edge-01",
        "reg.io/imagenet:1.0",
        &["set(v=5): true", "schedule(imagenet): v > 3"],
    );
    harness.scheduler.apply_goals(vec![goal]).unwrap();

    harness.scheduler.tick(&SilentSink).await.unwrap();
    harness.drain_reserved(200).await;

    assert_eq!(
        harness.context.get("v"),
        Some(sg_node::ContextValue::from(5.0))
    );
    assert!(!harness.scheduler.is_reserved());
}

#[test]
fn workload_naming_is_deterministic_for_identical_anonymous_specs() {
    let a = PluginSpecBuilder::default()
        .image("reg.io/imagenet:1.0.0")
        .build();
    let b = PluginSpecBuilder::default()
        .image("reg.io/imagenet:1.0.0")
        .build();
    assert_eq!(a, b);
    assert_eq!(a.workload_name(1_700_000_000).unwrap(), b.workload_name(1_700_000_000).unwrap());

    let c = PluginSpecBuilder::default()
        .image("reg.io/imagenet:1.0.1")
        .build();
    assert_ne!(a.workload_name(1_700_000_000).unwrap(), c.workload_name(1_700_000_000).unwrap());
}

#[test]
fn a_named_spec_is_timestamped_instead_of_content_hashed() {
    let spec = PluginSpecBuilder::default()
        .image("reg.io/imagenet:1.0.0")
        .name("imagenet")
        .build();
    assert_eq!(spec.workload_name(1_700_000_000).unwrap(), "imagenet-1700000000");
}
