// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn register_credential_puts_user_then_permissions() {
    let mut server = mockito::Server::new_async().await;
    let user_mock = server
        .mock("PUT", "/api/users/plugin.imagenet:1.0.0")
        .with_status(201)
        .create_async()
        .await;
    let perm_mock = server
        .mock("PUT", "/api/permissions/%2F/plugin.imagenet:1.0.0")
        .with_status(201)
        .create_async()
        .await;

    let client = BrokerAdminClient::new(server.url(), "%2F");
    let credential = Credential {
        user: "plugin.imagenet:1.0.0".to_string(),
        pass: "deadbeef".to_string(),
    };
    client.register_credential(&credential).await.unwrap();

    user_mock.assert_async().await;
    perm_mock.assert_async().await;
}

#[tokio::test]
async fn register_credential_propagates_http_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/api/users/plugin.imagenet:1.0.0")
        .with_status(500)
        .create_async()
        .await;

    let client = BrokerAdminClient::new(server.url(), "%2F");
    let credential = Credential {
        user: "plugin.imagenet:1.0.0".to_string(),
        pass: "deadbeef".to_string(),
    };

    assert!(client.register_credential(&credential).await.is_err());
}
