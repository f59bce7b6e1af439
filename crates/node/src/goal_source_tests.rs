// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fetch_decodes_goal_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/goals/node-a")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"id":"g1","name":"job-1","sub_goals":[],"conditions":[]}]}"#)
        .create_async()
        .await;

    let source = GoalSource::new(server.url(), "node-a", None);
    let goals = source.fetch().await.unwrap();

    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].id, "g1");
    mock.assert_async().await;
}

#[tokio::test]
async fn fetch_sends_bearer_token_when_configured() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/goals/node-a")
        .match_header("authorization", "Bearer tok123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    let source = GoalSource::new(server.url(), "node-a", Some("tok123".to_string()));
    let goals = source.fetch().await.unwrap();

    assert!(goals.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn fetch_maps_error_status_to_goal_source_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/goals/node-a")
        .with_status(500)
        .create_async()
        .await;

    let source = GoalSource::new(server.url(), "node-a", None);
    assert!(matches!(source.fetch().await, Err(NodeError::GoalSource(_))));
}

#[tokio::test]
async fn fetch_surfaces_envelope_error_string() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/goals/node-a")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"node not found"}"#)
        .create_async()
        .await;

    let source = GoalSource::new(server.url(), "node-a", None);
    let err = source.fetch().await.unwrap_err();
    assert!(matches!(err, NodeError::GoalSource(msg) if msg == "node not found"));
}
