// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LaunchAndWatch` failure recovery, per spec.md §4.6: a workload that
//! comes up `Failed` returns its plugin to `Waiting` and clears the node's
//! `reserved` flag so the next schedulable plugin can launch.

use sg_adapters::{ResourceManager, WorkloadPhase};
use sg_core::{PluginSpecBuilder, SchedulingStatus, ScienceGoal, SubGoal};

use crate::prelude::{NodeHarness, SilentSink};

fn two_plugin_goal() -> ScienceGoal {
    let mut sub_goal = SubGoal::new("edge-01");
    sub_goal.plugins = vec![
        PluginSpecBuilder::default().name("flaky").build(),
        PluginSpecBuilder::default().name("steady").build(),
    ];
    sub_goal.rules = vec![
        "schedule(flaky): true".to_string(),
        "schedule(steady): true".to_string(),
    ];
    ScienceGoal::new("goal-1", "two-plugin-goal", vec![sub_goal])
}

#[tokio::test]
async fn a_failed_workload_frees_the_node_for_the_next_plugin() {
    let harness = NodeHarness::new("edge-01");
    harness.scheduler.apply_goals(vec![two_plugin_goal()]).unwrap();
    harness.resource_manager.fail_on_launch("flaky");

    harness.scheduler.tick(&SilentSink).await.unwrap();
    harness.drain_reserved(200).await;

    // Both plugins were enqueued by the same tick (one `reserved` slot),
    // so only one has run to completion; drive further ticks until the
    // second clears too.
    for _ in 0..20 {
        if harness.scheduler.plugin("steady").unwrap().scheduling_status
            == SchedulingStatus::Waiting
            && harness.scheduler.plugin("flaky").unwrap().scheduling_status
                == SchedulingStatus::Waiting
        {
            break;
        }
        harness.scheduler.tick(&SilentSink).await.unwrap();
        harness.drain_reserved(200).await;
    }

    assert!(!harness.scheduler.is_reserved());
    assert_eq!(
        harness.scheduler.plugin("flaky").unwrap().scheduling_status,
        SchedulingStatus::Waiting
    );
    assert_eq!(
        harness.scheduler.plugin("steady").unwrap().scheduling_status,
        SchedulingStatus::Waiting
    );

    // Both workloads actually ran: the flaky one came up failed and the
    // steady one completed, proving the node moved on instead of wedging
    // on the first plugin's failure.
    assert_eq!(
        harness.resource_manager.get_status("flaky").await.unwrap(),
        WorkloadPhase::Failed
    );
    assert_eq!(
        harness.resource_manager.get_status("steady").await.unwrap(),
        WorkloadPhase::Succeeded
    );
}
