// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker credential minting, shared by every `ResourceManager` backend so
//! the `user`/`pass` shape stays identical regardless of where the
//! workload actually runs.

use rand::RngCore;

use crate::resource_manager::Credential;

/// `user = "plugin." + lower(name) + ":" + version`, `pass` = 16 random
/// bytes hex-encoded.
pub fn generate_credential(plugin_name: &str, version: &str) -> Credential {
    let user = format!("plugin.{}:{}", plugin_name.to_lowercase(), version);
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    Credential {
        user,
        pass: hex::encode(bytes),
    }
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
