// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SSE goal subscription: replay-on-connect followed by live lifecycle
//! events, per spec.md §4.3/§6.

use sg_core::{NodeManifest, PluginManifest};
use sg_wire::ApiMessage;

use crate::prelude::CloudHarness;

fn catalog() -> (Vec<NodeManifest>, Vec<PluginManifest>) {
    let node = NodeManifest::new("edge-01");
    let mut plugin = PluginManifest::new("reg.io/imagenet:1.0");
    plugin.nodes.insert("edge-01".to_string());
    (vec![node], vec![plugin])
}

/// Reads SSE frames off a streaming response until `needle` appears in an
/// `event:` line or the byte budget is exhausted.
async fn read_until(response: reqwest::Response, needle: &str, max_bytes: usize) -> String {
    use tokio_stream::StreamExt;

    let mut stream = response.bytes_stream();
    let mut collected = String::new();
    while collected.len() < max_bytes {
        match tokio::time::timeout(std::time::Duration::from_secs(5), stream.next()).await {
            Ok(Some(Ok(chunk))) => {
                collected.push_str(&String::from_utf8_lossy(&chunk));
                if collected.contains(needle) {
                    break;
                }
            }
            _ => break,
        }
    }
    collected
}

#[tokio::test]
async fn submit_after_subscribing_delivers_a_live_event() {
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

    let sse_response = harness
        .client
        .get(harness.url("/goals/edge-01"))
        .header("accept", "text/event-stream")
        .send()
        .await
        .expect("open sse stream");
    assert!(sse_response.status().is_success());

    let read = tokio::spawn(read_until(sse_response, "EventGoalStatusSubmitted", 16 * 1024));

    // give the subscription a moment to register before the event fires.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let submit: ApiMessage<serde_json::Value> = harness
        .get_auth(&format!("/submit?id={job_id}"), "alice")
        .await
        .json()
        .await
        .expect("decode submit response");
    assert_eq!(submit.data.expect("submit ok")["job"]["status"], "Submitted");

    let body = read.await.expect("join read task");
    assert!(
        body.contains("EventGoalStatusSubmitted"),
        "expected a submitted-goal event in the stream, got: {body}"
    );
}

#[tokio::test]
async fn force_remove_while_running_delivers_a_removed_event() {
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

    harness
        .get_auth(&format!("/submit?id={job_id}"), "alice")
        .await;

    let sse_response = harness
        .client
        .get(harness.url("/goals/edge-01"))
        .header("accept", "text/event-stream")
        .send()
        .await
        .expect("open sse stream");

    let read = tokio::spawn(read_until(sse_response, "EventJobStatusRemoved", 16 * 1024));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let removed: ApiMessage<serde_json::Value> = harness
        .get_auth(&format!("/jobs/{job_id}/rm?force=true"), "alice")
        .await
        .json()
        .await
        .expect("decode remove response");
    assert_eq!(removed.data.expect("removed")["status"], "Removed");

    let body = read.await.expect("join read task");
    assert!(
        body.contains("EventJobStatusRemoved"),
        "expected a removed-job event in the stream, got: {body}"
    );
}
