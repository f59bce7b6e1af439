// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use sg_core::SgError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("store error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for SgError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => SgError::not_found(msg),
            other => SgError::transient(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
