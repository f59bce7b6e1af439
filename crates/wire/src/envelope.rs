// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `{data, error}` envelope every Cloud API response is wrapped in.

use serde::{Deserialize, Serialize};

/// Uniform API response envelope.
///
/// Exactly one of `data`/`error` is meaningful at a time; both are emitted
/// (one as `null`) so clients can pattern-match on shape without inspecting
/// HTTP status first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiMessage<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    /// Aggregate validation errors (e.g. from the job validator) into a
    /// single newline-joined error string.
    pub fn err_list<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: std::fmt::Display,
    {
        let joined = messages
            .into_iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::err(joined)
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
