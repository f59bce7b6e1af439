// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment-variable access for the `sg-cloud` binary,
//! matching the teacher daemon's `env.rs` shape: one function per setting,
//! no config-file framework.

use std::path::PathBuf;

/// Root directory the embedded job store and the node/plugin catalogs
/// live under (`<dir>/job.db`, `<dir>/nodes/*.json`, `<dir>/plugins/*.json`).
pub fn data_dir() -> PathBuf {
    std::env::var("SG_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/var/lib/sg-cloud"))
}

/// Address the HTTP API binds to.
pub fn listen_addr() -> String {
    std::env::var("SG_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
}

/// External auth service URL the `HttpAuthenticator` validates bearer
/// tokens against. Required at startup; there is no insecure fallback.
pub fn auth_service_url() -> Option<String> {
    std::env::var("SG_AUTH_SERVICE_URL")
        .ok()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
