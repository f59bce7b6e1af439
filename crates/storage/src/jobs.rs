// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `jobs` bucket: every [`Job`] the Cloud Scheduler knows about, keyed
//! by its decimal `JobId`.

use sg_core::{Job, JobId, JobStatus};
use sled::Db;

use crate::bucket::Bucket;
use crate::error::StorageError;

pub struct JobStore {
    bucket: Bucket,
}

impl JobStore {
    pub fn open(db: &Db) -> Result<Self, StorageError> {
        Ok(Self {
            bucket: Bucket::open(db, "jobs")?,
        })
    }

    /// Allocate a monotonic ID from the bucket's sequence, set status
    /// `Created`, and persist.
    pub fn add_job(&self, mut job: Job) -> Result<Job, StorageError> {
        let id = self.bucket.next_sequence()?;
        job.id = JobId::new(id);
        job.status = JobStatus::Created;
        self.put(&job)?;
        Ok(job)
    }

    pub fn put(&self, job: &Job) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(job)?;
        self.bucket.insert(&job.id.to_string(), bytes)
    }

    pub fn get(&self, id: JobId) -> Result<Option<Job>, StorageError> {
        match self.bucket.get(&id.to_string())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn remove(&self, id: JobId) -> Result<(), StorageError> {
        self.bucket.remove(&id.to_string())
    }

    /// All stored jobs, optionally filtered by user.
    pub fn list(&self, user: Option<&str>) -> Result<Vec<Job>, StorageError> {
        let mut jobs = Vec::new();
        for entry in self.bucket.iter_values() {
            let job: Job = serde_json::from_slice(&entry?)?;
            if user.map(|u| job.user == u).unwrap_or(true) {
                jobs.push(job);
            }
        }
        jobs.sort_by_key(|j| j.id);
        Ok(jobs)
    }

    /// Jobs in `Submitted` or `Running` status, used to rehydrate the
    /// in-memory ScienceGoal table at startup.
    pub fn load_active(&self) -> Result<Vec<Job>, StorageError> {
        Ok(self
            .list(None)?
            .into_iter()
            .filter(|j| matches!(j.status, JobStatus::Submitted | JobStatus::Running))
            .collect())
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
