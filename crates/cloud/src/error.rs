// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps [`SgError`] onto HTTP status codes and the `ApiMessage` envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sg_core::SgError;
use sg_wire::ApiMessage;

/// Thin wrapper so handlers can `?`-propagate `SgError` straight into an
/// axum response.
#[derive(Debug)]
pub struct ApiError(pub SgError);

impl From<SgError> for ApiError {
    fn from(err: SgError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SgError::Validation(_) => StatusCode::BAD_REQUEST,
            SgError::NotFound(_) => StatusCode::NOT_FOUND,
            SgError::Conflict(_) => StatusCode::CONFLICT,
            SgError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SgError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            SgError::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body: ApiMessage<()> = ApiMessage::err(self.0.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
