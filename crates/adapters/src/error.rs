// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use sg_core::SgError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("kubernetes api error: {0}")]
    Kube(#[from] kube::Error),

    #[error("broker admin request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("workload not found: {0}")]
    NotFound(String),

    #[error("transient adapter failure: {0}")]
    Transient(String),

    #[error("adapter configuration error: {0}")]
    Config(String),
}

pub type AdapterResult<T> = Result<T, AdapterError>;

impl From<AdapterError> for SgError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::NotFound(msg) => SgError::not_found(msg),
            AdapterError::Kube(_) | AdapterError::Http(_) | AdapterError::Transient(_) => {
                SgError::transient(err.to_string())
            }
            AdapterError::Config(msg) => SgError::fatal(msg),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
