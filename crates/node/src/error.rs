// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node-side error kind. Rule/condition parsing failures map onto
//! [`sg_core::SgError::Validation`]; everything else that crosses the
//! network or the cluster maps onto [`sg_core::SgError::Transient`].

use sg_adapters::AdapterError;
use sg_core::SgError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("rule condition error: {0}")]
    Condition(String),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("goal source error: {0}")]
    GoalSource(String),
}

pub type NodeResult<T> = Result<T, NodeError>;

impl From<NodeError> for SgError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::Condition(msg) => SgError::validation(msg),
            NodeError::Adapter(e) => e.into(),
            NodeError::GoalSource(msg) => SgError::transient(msg),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
