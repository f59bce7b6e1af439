// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cloud Goal Manager: owns the `jobs` store and the in-memory ScienceGoal
//! table, compiling submitted jobs via the [`Validator`] and publishing
//! lifecycle events through the [`Notifier`]. Grounded on the original
//! `cloudgoalmanager.go`'s `AddJob`/`UpdateJob`/`SuspendJob`/`RemoveJob`/
//! `GetScienceGoalsForNode`/`LoadScienceGoalsFromJobDB` contract.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

use sg_core::{
    Event, EventBody, EventType, Job, JobId, JobPatch, JobStatus, ScienceGoal, SgError, SgResult,
    ValidationIssue,
};
use sg_storage::JobStore;

use crate::notifier::Notifier;
use crate::validator::Validator;

/// The reason recorded against a job suspended via [`GoalManager::suspend_job`].
/// Matches the original's fixed suspend-reason string.
pub const SUSPEND_REASON: &str = "suspended by user request";

pub struct GoalManager {
    store: JobStore,
    validator: Validator,
    notifier: Arc<Notifier>,
    goals: Mutex<HashMap<JobId, ScienceGoal>>,
}

impl GoalManager {
    pub fn new(store: JobStore, validator: Validator, notifier: Arc<Notifier>) -> Self {
        Self {
            store,
            validator,
            notifier,
            goals: Mutex::new(HashMap::new()),
        }
    }

    /// `AddJob(job) -> jobID`: allocates a monotonic ID, sets status
    /// `Created`, persists.
    pub fn add_job(&self, job: Job) -> SgResult<Job> {
        Ok(self.store.add_job(job)?)
    }

    /// `UpdateJob(job, submit)`: applies `patch`; if `submit`, transitions to
    /// `Submitted`, compiles a ScienceGoal, installs it into the in-memory
    /// table, and publishes `GoalStatusSubmitted` to every node it targets.
    pub fn update_job(
        &self,
        id: JobId,
        patch: JobPatch,
        submit: bool,
    ) -> SgResult<(Job, Vec<ValidationIssue>)> {
        let mut job = self
            .store
            .get(id)?
            .ok_or_else(|| SgError::not_found(format!("job {id} not found")))?;
        job.apply_edit(patch);

        if !submit {
            self.store.put(&job)?;
            return Ok((job, Vec::new()));
        }

        let (goal, errors) = self.validator.validate(&job);
        let goal = match goal {
            Some(goal) => goal,
            None => return Ok((job, errors)),
        };

        job.status = JobStatus::Submitted;
        job.science_goal = Some(goal.clone());
        self.store.put(&job)?;
        self.goals.lock().insert(job.id, goal.clone());

        for node in goal.node_names() {
            self.notifier.notify(
                &node,
                Event::new(
                    EventType::GoalStatusSubmitted,
                    Utc::now(),
                    EventBody::empty().with_job(job.clone()).with_goal(goal.clone()),
                ),
            );
        }

        Ok((job, errors))
    }

    /// `SuspendJob(id)`: transitions to `Suspended`, drops the goal from the
    /// in-memory table, and publishes `JobStatusSuspended`.
    pub fn suspend_job(&self, id: JobId) -> SgResult<Job> {
        let mut job = self
            .store
            .get(id)?
            .ok_or_else(|| SgError::not_found(format!("job {id} not found")))?;

        job.status = JobStatus::Suspended;
        self.store.put(&job)?;
        let goal = self.goals.lock().remove(&id);

        self.publish_for_goal(
            &goal,
            EventType::JobStatusSuspended,
            EventBody::empty()
                .with_job(job.clone())
                .with_reason(SUSPEND_REASON),
        );

        Ok(job)
    }

    /// `RemoveJob(id, force)`: rejects removal of a `Running` job unless
    /// `force`; otherwise transitions to `Removed`, drops the goal, and
    /// publishes `JobStatusRemoved`.
    pub fn remove_job(&self, id: JobId, force: bool) -> SgResult<Job> {
        let mut job = self
            .store
            .get(id)?
            .ok_or_else(|| SgError::not_found(format!("job {id} not found")))?;

        if job.status == JobStatus::Running && !force {
            return Err(SgError::conflict(
                "cannot remove a running job without force",
            ));
        }

        job.status = JobStatus::Removed;
        self.store.put(&job)?;
        let goal = self.goals.lock().remove(&id);

        self.publish_for_goal(
            &goal,
            EventType::JobStatusRemoved,
            EventBody::empty().with_job(job.clone()),
        );

        Ok(job)
    }

    /// The shared notifier, for callers (the HTTP layer's SSE endpoint) that
    /// need to subscribe directly rather than through a goal-manager method.
    pub fn notifier(&self) -> Arc<Notifier> {
        Arc::clone(&self.notifier)
    }

    /// Validates `job` against the catalogs without persisting anything, for
    /// a `POST /submit?dryrun=true` body that names no existing job.
    pub fn preview(&self, job: &Job) -> (Option<ScienceGoal>, Vec<ValidationIssue>) {
        self.validator.validate(job)
    }

    pub fn get_job(&self, id: JobId) -> SgResult<Job> {
        self.store
            .get(id)?
            .ok_or_else(|| SgError::not_found(format!("job {id} not found")))
    }

    pub fn list_jobs(&self, user: Option<&str>) -> SgResult<Vec<Job>> {
        Ok(self.store.list(user)?)
    }

    /// Validates `id` against the catalogs without persisting or installing
    /// the result, for `?dryrun=true` submissions. The returned Job carries
    /// the compiled goal (if any) in its `science_goal` field for display
    /// only; nothing is written to the store or the in-memory goal table.
    pub fn validate_job(&self, id: JobId) -> SgResult<(Job, Vec<ValidationIssue>)> {
        let job = self.get_job(id)?;
        let (goal, errors) = self.validator.validate(&job);
        let mut preview = job;
        preview.science_goal = goal;
        Ok((preview, errors))
    }

    /// Every goal with a SubGoal targeting `node_name`, matched
    /// case-insensitively.
    pub fn get_science_goals_for_node(&self, node_name: &str) -> Vec<ScienceGoal> {
        self.goals
            .lock()
            .values()
            .filter(|goal| goal.has_node(node_name))
            .cloned()
            .collect()
    }

    /// `LoadScienceGoalsFromJobDB`: on startup, scan jobs and rehydrate the
    /// in-memory goal table for every job already in `Submitted` or
    /// `Running` status. Does not re-publish events; subscribers connecting
    /// after startup get the current set via the SSE replay-on-connect path.
    pub fn load_from_store(&self) -> SgResult<()> {
        let mut goals = self.goals.lock();
        for job in self.store.load_active()? {
            if let Some(goal) = job.science_goal.clone() {
                goals.insert(job.id, goal);
            }
        }
        Ok(())
    }

    fn publish_for_goal(&self, goal: &Option<ScienceGoal>, event_type: EventType, body: EventBody) {
        let Some(goal) = goal else { return };
        for node in goal.node_names() {
            self.notifier
                .notify(&node, Event::new(event_type, Utc::now(), body.clone()));
        }
    }
}

#[cfg(test)]
#[path = "goal_manager_tests.rs"]
mod tests;
