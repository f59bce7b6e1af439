// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence for the Cloud Scheduler: a single `jobs` bucket in an
//! embedded key/value store, plus the startup catalog loaders for node and
//! plugin manifests.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod bucket;
mod catalog;
mod error;
mod jobs;

pub use bucket::Bucket;
pub use catalog::{load_node_manifests, load_plugin_manifests};
pub use error::{StorageError, StorageResult};
pub use jobs::JobStore;

/// Open the durable store rooted at `data_dir/job.db`.
pub fn open_db(data_dir: &std::path::Path) -> StorageResult<sled::Db> {
    let path = data_dir.join("job.db");
    sled::open(path).map_err(StorageError::from)
}
