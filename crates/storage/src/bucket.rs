// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single named tree ("bucket") within the embedded store, with a
//! per-database monotonic sequence and atomic update transactions.

use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionalTree};
use sled::{Db, Tree};

use crate::error::StorageError;

/// One logical bucket, e.g. the `jobs` bucket.
#[derive(Clone)]
pub struct Bucket {
    db: Db,
    tree: Tree,
}

impl Bucket {
    pub fn open(db: &Db, name: &str) -> Result<Self, StorageError> {
        let tree = db.open_tree(name)?;
        Ok(Self {
            db: db.clone(),
            tree,
        })
    }

    /// Next value from the database-wide monotonic sequence.
    ///
    /// Shared across buckets opened on the same `Db`; fine for our purposes
    /// since only one bucket (`jobs`) currently allocates IDs.
    pub fn next_sequence(&self) -> Result<u64, StorageError> {
        self.db.generate_id().map_err(StorageError::from)
    }

    pub fn get(&self, key: &str) -> Result<Option<sled::IVec>, StorageError> {
        self.tree.get(key).map_err(StorageError::from)
    }

    pub fn insert(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.tree.insert(key, value)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.tree.remove(key)?;
        Ok(())
    }

    pub fn iter_values(&self) -> impl Iterator<Item = Result<sled::IVec, StorageError>> + '_ {
        self.tree.iter().values().map(|r| r.map_err(StorageError::from))
    }

    /// Run `f` as an atomic transaction against this bucket.
    pub fn update<F, R>(&self, f: F) -> Result<R, StorageError>
    where
        F: Fn(&TransactionalTree) -> Result<R, ConflictableTransactionError<StorageError>>,
    {
        self.tree.transaction(f).map_err(|err| match err {
            TransactionError::Abort(inner) => inner,
            TransactionError::Storage(sled_err) => StorageError::from(sled_err),
        })
    }

    /// Read-only view. Sled reads are already point-in-time consistent;
    /// named to pair with `update` as the store's read/write transaction pair.
    pub fn view<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Tree) -> R,
    {
        f(&self.tree)
    }
}

#[cfg(test)]
#[path = "bucket_tests.rs"]
mod tests;
