// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Goal source: fetches this node's current [`ScienceGoal`] set from the
//! Cloud Scheduler's `/goals/:node` endpoint. Mirrors `HttpAuthenticator`'s
//! plain-`reqwest`-client shape; the node binary polls it on an interval
//! rather than holding the SSE upgrade of that same endpoint open, keeping
//! the client side of the wire contract as simple as the teacher's daemon
//! clients for its own HTTP-less IPC.

use reqwest::Client;

use sg_core::ScienceGoal;
use sg_wire::ApiMessage;

use crate::error::{NodeError, NodeResult};

/// Pulls the current goal snapshot for one node from the Cloud Scheduler.
pub struct GoalSource {
    http: Client,
    base_url: String,
    node_name: String,
    auth_token: Option<String>,
}

impl GoalSource {
    pub fn new(
        base_url: impl Into<String>,
        node_name: impl Into<String>,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            node_name: node_name.into(),
            auth_token,
        }
    }

    /// `GET {base_url}/api/v1/goals/{node_name}`, decoded as the plain-JSON
    /// snapshot branch of that endpoint (no `Accept: text/event-stream`).
    pub async fn fetch(&self) -> NodeResult<Vec<ScienceGoal>> {
        let url = format!("{}/api/v1/goals/{}", self.base_url, self.node_name);
        let mut request = self.http.get(&url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NodeError::GoalSource(format!("goal endpoint unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(NodeError::GoalSource(format!(
                "goal endpoint returned {}",
                response.status()
            )));
        }

        let envelope: ApiMessage<Vec<ScienceGoal>> = response
            .json()
            .await
            .map_err(|e| NodeError::GoalSource(format!("malformed goal snapshot: {e}")))?;

        envelope
            .data
            .ok_or_else(|| NodeError::GoalSource(envelope.error.unwrap_or_default()))
    }
}

#[cfg(test)]
#[path = "goal_source_tests.rs"]
mod tests;
