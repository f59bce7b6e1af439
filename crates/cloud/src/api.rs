// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface: a thin layer of route handlers, each wrapping a
//! [`GoalManager`] call and returning a uniform [`ApiMessage`] envelope.
//! Mutating endpoints (`/create`, `/edit`, `/submit`, `/jobs/:id/rm`)
//! authenticate the caller's bearer token through the [`Authenticator`]
//! capability before touching the goal manager; the two read paths
//! (`/jobs`, `/goals/:node`) are open, matching a Node Scheduler's need to
//! poll its own goal feed without first negotiating a user token.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use sg_core::{Job, JobId, JobPatch, ScienceGoal, SgError, ValidationIssue};
use sg_wire::{decode_body, sse_frame, ApiMessage};

use crate::auth::Authenticator;
use crate::error::ApiError;
use crate::goal_manager::GoalManager;
use crate::notifier::{Notifier, SubscriptionId};

#[derive(Clone)]
pub struct AppState {
    pub goal_manager: Arc<GoalManager>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(goal_manager: Arc<GoalManager>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            goal_manager,
            authenticator,
        }
    }
}

/// Mounts every handler under the `/api/v1` prefix per spec.md §6.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .route("/", get(root))
                .route("/create", get(create_get).post(create_post))
                .route("/edit", post(edit))
                .route("/submit", get(submit_get).post(submit_post))
                .route("/jobs", get(list_jobs))
                .route("/jobs/:id/status", get(job_status))
                .route("/jobs/:id/rm", get(job_remove))
                .route("/goals/:node", get(goals)),
        )
        .with_state(state)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_string)
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let token =
        bearer_token(headers).ok_or_else(|| SgError::unauthorized("missing bearer token"))?;
    Ok(state.authenticator.authenticate(&token).await?)
}

#[derive(Serialize)]
struct Identity {
    service: &'static str,
    version: &'static str,
}

async fn root() -> Json<ApiMessage<Identity>> {
    Json(ApiMessage::ok(Identity {
        service: "sg-cloud",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Deserialize)]
struct CreateQuery {
    name: Option<String>,
}

async fn create_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CreateQuery>,
) -> Result<Json<ApiMessage<Job>>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let name = query
        .name
        .ok_or_else(|| SgError::validation("name is required"))?;
    let job = state.goal_manager.add_job(Job::new(name, user))?;
    Ok(Json(ApiMessage::ok(job)))
}

async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiMessage<Job>>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let mut job: Job = decode_body(&body).map_err(|e| SgError::validation(e.to_string()))?;
    if job.user.is_empty() {
        job.user = user;
    }
    let job = state.goal_manager.add_job(job)?;
    Ok(Json(ApiMessage::ok(job)))
}

#[derive(Deserialize)]
struct EditQuery {
    id: u64,
}

async fn edit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EditQuery>,
    body: Bytes,
) -> Result<Json<ApiMessage<Job>>, ApiError> {
    authenticate(&state, &headers).await?;
    let patch: JobPatch = decode_body(&body).map_err(|e| SgError::validation(e.to_string()))?;
    let (job, _issues) = state
        .goal_manager
        .update_job(JobId::new(query.id), patch, false)?;
    Ok(Json(ApiMessage::ok(job)))
}

#[derive(Deserialize, Default)]
struct SubmitQuery {
    id: Option<u64>,
    #[serde(default)]
    dryrun: bool,
}

#[derive(Serialize)]
struct SubmitResponse {
    job: Job,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<ValidationIssue>,
    dryrun: bool,
}

/// Two code paths, both kept: `?id=` re-submits a job already on file,
/// while a POST body with no matching job on record is created and
/// submitted in one call. `dryrun` short-circuits either path before any
/// store write or in-memory goal install happens.
async fn submit_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SubmitQuery>,
) -> Result<Json<ApiMessage<SubmitResponse>>, ApiError> {
    authenticate(&state, &headers).await?;
    let id = query
        .id
        .ok_or_else(|| SgError::validation("id is required"))?;
    let id = JobId::new(id);

    let (job, issues) = if query.dryrun {
        state.goal_manager.validate_job(id)?
    } else {
        state
            .goal_manager
            .update_job(id, JobPatch::default(), true)?
    };

    Ok(Json(ApiMessage::ok(SubmitResponse {
        job,
        issues,
        dryrun: query.dryrun,
    })))
}

async fn submit_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SubmitQuery>,
    body: Bytes,
) -> Result<Json<ApiMessage<SubmitResponse>>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    let mut job: Job = decode_body(&body).map_err(|e| SgError::validation(e.to_string()))?;
    if job.user.is_empty() {
        job.user = user;
    }

    if query.dryrun {
        let (goal, issues) = state.goal_manager.preview(&job);
        job.science_goal = goal;
        return Ok(Json(ApiMessage::ok(SubmitResponse {
            job,
            issues,
            dryrun: true,
        })));
    }

    let job = state.goal_manager.add_job(job)?;
    let (job, issues) = state
        .goal_manager
        .update_job(job.id, JobPatch::default(), true)?;
    Ok(Json(ApiMessage::ok(SubmitResponse {
        job,
        issues,
        dryrun: false,
    })))
}

#[derive(Deserialize, Default)]
struct JobsQuery {
    user: Option<String>,
}

async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<ApiMessage<Vec<Job>>>, ApiError> {
    let jobs = state.goal_manager.list_jobs(query.user.as_deref())?;
    Ok(Json(ApiMessage::ok(jobs)))
}

async fn job_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApiMessage<Job>>, ApiError> {
    let job = state.goal_manager.get_job(JobId::new(id))?;
    Ok(Json(ApiMessage::ok(job)))
}

#[derive(Deserialize, Default)]
struct RemoveQuery {
    #[serde(default)]
    force: bool,
    #[serde(default)]
    suspend: bool,
}

async fn job_remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(query): Query<RemoveQuery>,
) -> Result<Json<ApiMessage<Job>>, ApiError> {
    authenticate(&state, &headers).await?;
    let id = JobId::new(id);
    let job = if query.suspend {
        state.goal_manager.suspend_job(id)?
    } else {
        state.goal_manager.remove_job(id, query.force)?
    };
    Ok(Json(ApiMessage::ok(job)))
}

/// Drops the node's notifier subscription whenever the streaming response
/// body is dropped, including a client disconnecting mid-stream.
struct UnsubscribeGuard {
    notifier: Arc<Notifier>,
    id: SubscriptionId,
}

impl Drop for UnsubscribeGuard {
    fn drop(&mut self) {
        self.notifier.unsubscribe(self.id);
    }
}

/// Returns the node's current goal set as a JSON snapshot, or, when the
/// caller sends `Accept: text/event-stream`, upgrades to a live
/// subscription: the snapshot replayed as `EventGoalAdded` frames followed
/// by every subsequent lifecycle event addressed to this node.
async fn goals(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(node_name): Path<String>,
) -> Result<Response, ApiError> {
    let snapshot: Vec<ScienceGoal> = state.goal_manager.get_science_goals_for_node(&node_name);

    let wants_sse = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("text/event-stream"))
        .unwrap_or(false);

    if !wants_sse {
        return Ok(Json(ApiMessage::ok(snapshot)).into_response());
    }

    let notifier = state.goal_manager.notifier();
    let body_stream = async_stream::stream! {
        for goal in snapshot {
            if let Ok(frame) = sse_frame("EventGoalAdded", &goal) {
                yield Ok::<_, Infallible>(frame);
            }
        }

        let (sub_id, mut rx) = notifier.subscribe(node_name.clone());
        let _guard = UnsubscribeGuard { notifier: Arc::clone(&notifier), id: sub_id };

        while let Some(event) = rx.recv().await {
            if let Ok(frame) = sse_frame(&event.event_type.to_string(), &event.body) {
                yield Ok::<_, Infallible>(frame);
            }
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(body_stream))
        .map_err(|e| ApiError(SgError::fatal(e.to_string())))
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
