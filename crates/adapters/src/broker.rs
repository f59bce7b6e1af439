// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message broker admin client: pushes plugin credentials into the broker's
//! admin HTTP API (user + scoped permissions), matching the original
//! `resourcemanager.go`'s broker-management calls but ported to a plain
//! `reqwest` client rather than a broker-specific SDK.

use reqwest::Client;
use serde::Serialize;

use crate::error::AdapterResult;
use crate::resource_manager::Credential;

#[derive(Serialize)]
struct UserPayload<'a> {
    password: &'a str,
    tags: &'a str,
}

#[derive(Serialize)]
struct PermissionsPayload {
    configure: String,
    write: String,
    read: String,
}

/// Admin HTTP client for a broker exposing a RabbitMQ-management-style API:
/// `PUT /api/users/{user}` and `PUT /api/permissions/{vhost}/{user}`.
pub struct BrokerAdminClient {
    http: Client,
    base_url: String,
    vhost: String,
}

impl BrokerAdminClient {
    pub fn new(base_url: impl Into<String>, vhost: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            vhost: vhost.into(),
        }
    }

    /// Registers a plugin credential with the broker: a user account whose
    /// `configure` permission is limited to broker-generated queues
    /// (`^amq.gen`) and whose `write`/`read` permissions are unrestricted.
    pub async fn register_credential(&self, credential: &Credential) -> AdapterResult<()> {
        let user_url = format!("{}/api/users/{}", self.base_url, credential.user);
        self.http
            .put(&user_url)
            .json(&UserPayload {
                password: &credential.pass,
                tags: "",
            })
            .send()
            .await?
            .error_for_status()?;

        let perm_url = format!(
            "{}/api/permissions/{}/{}",
            self.base_url, self.vhost, credential.user
        );
        self.http
            .put(&perm_url)
            .json(&PermissionsPayload {
                configure: "^amq.gen".to_string(),
                write: ".*".to_string(),
                read: ".*".to_string(),
            })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "broker_tests.rs"]
mod tests;
