// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Body decoding for write endpoints: content-type is optional, so both
//! JSON and YAML are attempted regardless of the declared `Content-Type`.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("body is neither valid JSON nor YAML: json error: {json_err}; yaml error: {yaml_err}")]
    Undecodable { json_err: String, yaml_err: String },
}

/// Decode a request body as JSON, falling back to YAML (a syntactic
/// superset of JSON for the common case, but attempted separately so error
/// messages stay meaningful for genuinely YAML-only bodies).
pub fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    match serde_json::from_slice::<T>(bytes) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_slice::<T>(bytes).map_err(|yaml_err| {
            CodecError::Undecodable {
                json_err: json_err.to_string(),
                yaml_err: yaml_err.to_string(),
            }
        }),
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
