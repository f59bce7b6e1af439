// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds shared across the scheduling pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level error kind. Each variant carries its own HTTP/propagation
/// semantics; see callers in `sg-cloud`/`sg-node` for the mapping.
#[derive(Debug, Error)]
pub enum SgError {
    /// Job/spec contents rejected by the validator. Surfaced to the API as 400.
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist. Surfaced as 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// Requested transition conflicts with current state (e.g. remove-while-running
    /// without `force`). Surfaced as 409/400 depending on the caller.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Bearer token missing or rejected by the auth service. Surfaced as 401.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Cluster/broker/store call timed out or was refused; safe to retry with backoff.
    #[error("transient error: {0}")]
    Transient(String),

    /// Startup misconfiguration or store corruption; the process aborts.
    #[error("fatal error: {0}")]
    Fatal(String),
}

impl SgError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        Self::Fatal(msg.into())
    }

    /// Whether a caller may retry this error with bounded backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SgError::Transient(_))
    }
}

pub type SgResult<T> = Result<T, SgError>;

/// A single field-level validation failure, aggregated into a list by the
/// job validator rather than failing fast on the first problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
