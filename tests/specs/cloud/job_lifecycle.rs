// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end job submission over the real `/api/v1` HTTP surface: create,
//! submit, re-submit, and force-remove, per spec.md §8's seed scenarios.

use sg_core::{NodeManifest, PluginManifest};
use sg_wire::ApiMessage;

use crate::prelude::CloudHarness;

fn catalog() -> (Vec<NodeManifest>, Vec<PluginManifest>) {
    let node = NodeManifest::new("edge-01");
    let mut plugin = PluginManifest::new("reg.io/imagenet:1.0");
    plugin.nodes.insert("edge-01".to_string());
    (vec![node], vec![plugin])
}

#[tokio::test]
async fn submit_distributes_a_goal_to_the_targeted_node() {
    let (nodes, plugins) = catalog();
    let harness = CloudHarness::start(nodes, plugins).await;

    let create: ApiMessage<serde_json::Value> = harness
        .post_auth(
            "/create",
            "alice",
            &serde_json::json!({
                "name": "imagenet-job",
                "user": "",
                "nodes": ["edge-01"],
                "plugins": [{"image": "reg.io/imagenet:1.0"}],
            }),
        )
        .await
        .json()
        .await
        .expect("decode create response");
    let job = create.data.expect("job created");
    let job_id = job["id"].as_u64().expect("job id");

    let submit: ApiMessage<serde_json::Value> = harness
        .get_auth(&format!("/submit?id={job_id}"), "alice")
        .await
        .json()
        .await
        .expect("decode submit response");
    let body = submit.data.expect("submit ok");
    assert_eq!(body["job"]["status"], "Submitted");
    assert!(body["issues"].as_array().unwrap().is_empty());

    let goals: ApiMessage<Vec<serde_json::Value>> = harness
        .client
        .get(harness.url("/goals/edge-01"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("decode goals response");
    let goals = goals.data.expect("goals snapshot");
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["sub_goals"][0]["node"], "edge-01");
}

#[tokio::test]
async fn resubmitting_the_same_job_keeps_its_goal_id_stable() {
    let (nodes, plugins) = catalog();
    let harness = CloudHarness::start(nodes, plugins).await;

    let create: ApiMessage<serde_json::Value> = harness
        .post_auth(
            "/create",
            "alice",
            &serde_json::json!({
                "name": "imagenet-job",
                "user": "",
                "nodes": ["edge-01"],
                "plugins": [{"image": "reg.io/imagenet:1.0"}],
            }),
        )
        .await
        .json()
        .await
        .expect("decode create response");
    let job_id = create.data.expect("job")["id"].as_u64().expect("job id");

    let first: ApiMessage<serde_json::Value> = harness
        .get_auth(&format!("/submit?id={job_id}"), "alice")
        .await
        .json()
        .await
        .expect("decode submit response");
    let first_goal_id = first.data.expect("submit ok")["job"]["science_goal"]["id"].clone();

    let second: ApiMessage<serde_json::Value> = harness
        .get_auth(&format!("/submit?id={job_id}"), "alice")
        .await
        .json()
        .await
        .expect("decode submit response");
    let second_goal_id = second.data.expect("submit ok")["job"]["science_goal"]["id"].clone();

    assert_eq!(first_goal_id, second_goal_id);
    assert!(!first_goal_id.as_str().unwrap().is_empty());

    let goals: ApiMessage<Vec<serde_json::Value>> = harness
        .client
        .get(harness.url("/goals/edge-01"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("decode goals response");
    // Re-submitting overwrites the same job's entry in the in-memory goal
    // table rather than accumulating a duplicate.
    assert_eq!(goals.data.expect("goals snapshot").len(), 1);
}

#[tokio::test]
async fn submit_with_dryrun_never_installs_a_goal() {
    let (nodes, plugins) = catalog();
    let harness = CloudHarness::start(nodes, plugins).await;

    let response: ApiMessage<serde_json::Value> = harness
        .post_auth(
            "/submit?dryrun=true",
            "alice",
            &serde_json::json!({
                "name": "imagenet-job",
                "user": "",
                "nodes": ["edge-01"],
                "plugins": [{"image": "reg.io/imagenet:1.0"}],
            }),
        )
        .await
        .json()
        .await
        .expect("decode submit response");
    let body = response.data.expect("dryrun ok");
    assert_eq!(body["dryrun"], true);
    assert_eq!(body["job"]["status"], "Created");

    let goals: ApiMessage<Vec<serde_json::Value>> = harness
        .client
        .get(harness.url("/goals/edge-01"))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("decode goals response");
    assert!(goals.data.expect("goals snapshot").is_empty());
}

#[tokio::test]
async fn remove_succeeds_without_force_when_the_job_is_not_running() {
    let (nodes, plugins) = catalog();
    let harness = CloudHarness::start(nodes, plugins).await;

    let create: ApiMessage<serde_json::Value> = harness
        .post_auth(
            "/create",
            "alice",
            &serde_json::json!({
                "name": "imagenet-job",
                "user": "",
                "nodes": ["edge-01"],
                "plugins": [{"image": "reg.io/imagenet:1.0"}],
            }),
        )
        .await
        .json()
        .await
        .expect("decode create response");
    let job_id = create.data.expect("job")["id"].as_u64().expect("job id");

    // A job in `Created` status is not `Running`, so an unforced remove
    // succeeds outright.
    let removed: ApiMessage<serde_json::Value> = harness
        .get_auth(&format!("/jobs/{job_id}/rm"), "alice")
        .await
        .json()
        .await
        .expect("decode remove response");
    assert_eq!(removed.data.expect("removed")["status"], "Removed");
}

#[tokio::test]
async fn reads_require_no_bearer_token_but_writes_do() {
    let (nodes, plugins) = catalog();
    let harness = CloudHarness::start(nodes, plugins).await;

    let jobs = harness
        .client
        .get(harness.url("/jobs"))
        .send()
        .await
        .expect("request");
    assert!(jobs.status().is_success());

    let create = harness
        .client
        .post(harness.url("/create?name=imagenet"))
        .send()
        .await
        .expect("request");
    let body: ApiMessage<serde_json::Value> = create.json().await.expect("decode");
    assert!(body.error.is_some());
}
