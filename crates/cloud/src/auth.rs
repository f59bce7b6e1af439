// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bearer-token authentication against an external auth service. A
//! capability trait plus a real HTTP-calling implementation and a
//! `test-support` fake, mirroring the teacher's adapter-trait-plus-fake
//! split (`sg-adapters`'s `ResourceManager`/`SimulateResourceManager`).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use sg_core::SgError;

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<String, SgError>;
}

#[derive(Deserialize)]
struct AuthResponse {
    user: String,
}

/// Calls an external auth service's `POST {url}?token=...` endpoint,
/// expecting `{"user": "..."}` on success.
pub struct HttpAuthenticator {
    http: Client,
    url: String,
}

impl HttpAuthenticator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<String, SgError> {
        let response = self
            .http
            .post(&self.url)
            .query(&[("token", token)])
            .send()
            .await
            .map_err(|e| SgError::transient(format!("auth service unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(SgError::unauthorized("token rejected by auth service"));
        }

        let parsed: AuthResponse = response
            .json()
            .await
            .map_err(|e| SgError::transient(format!("malformed auth response: {e}")))?;
        Ok(parsed.user)
    }
}

/// Accepts any non-empty token, returning the token itself as the user.
/// For tests that exercise the API surface without a running auth service.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeAuthenticator;

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<String, SgError> {
        if token.is_empty() {
            return Err(SgError::unauthorized("empty token"));
        }
        Ok(token.to_string())
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
