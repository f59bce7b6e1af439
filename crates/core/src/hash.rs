// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic hashing helpers used for goal identity and workload naming.

use sha2::{Digest, Sha256};

/// Stable hash of an ordered list of string parts. Each part is length-prefixed
/// before hashing so that no ambiguity can arise from concatenation (e.g.
/// `["ab", "c"]` and `["a", "bc"]` hash differently).
pub fn stable_hash(parts: &[&str]) -> String {
    hex::encode(digest_parts(parts))
}

/// Truncated stable hash: the first 4 bytes (8 hex characters) of [`stable_hash`].
pub fn stable_hash8(parts: &[&str]) -> String {
    hex::encode(&digest_parts(parts)[..4])
}

fn digest_parts(parts: &[&str]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    hasher.finalize().into()
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
