// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use axum::http::StatusCode;

#[test]
fn validation_maps_to_400() {
    let response = ApiError(SgError::validation("bad job")).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn not_found_maps_to_404() {
    let response = ApiError(SgError::not_found("job 9")).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn conflict_maps_to_409() {
    let response = ApiError(SgError::conflict("job running")).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[test]
fn fatal_maps_to_500() {
    let response = ApiError(SgError::fatal("store corrupt")).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
