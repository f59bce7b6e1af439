// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn open_temp() -> (tempfile::TempDir, Db) {
    let dir = tempfile::tempdir().unwrap();
    let db = sled::open(dir.path().join("test.db")).unwrap();
    (dir, db)
}

#[test]
fn sequence_is_monotonic() {
    let (_dir, db) = open_temp();
    let bucket = Bucket::open(&db, "jobs").unwrap();
    let a = bucket.next_sequence().unwrap();
    let b = bucket.next_sequence().unwrap();
    assert!(b > a);
}

#[test]
fn insert_and_get_round_trips() {
    let (_dir, db) = open_temp();
    let bucket = Bucket::open(&db, "jobs").unwrap();
    bucket.insert("1", b"hello".to_vec()).unwrap();
    let value = bucket.get("1").unwrap().unwrap();
    assert_eq!(&value[..], b"hello");
}

#[test]
fn remove_clears_key() {
    let (_dir, db) = open_temp();
    let bucket = Bucket::open(&db, "jobs").unwrap();
    bucket.insert("1", b"hello".to_vec()).unwrap();
    bucket.remove("1").unwrap();
    assert!(bucket.get("1").unwrap().is_none());
}

#[test]
fn update_is_all_or_nothing_on_abort() {
    let (_dir, db) = open_temp();
    let bucket = Bucket::open(&db, "jobs").unwrap();
    let result: Result<(), StorageError> = bucket.update(|txn| {
        txn.insert("1", "partial")?;
        Err(ConflictableTransactionError::Abort(StorageError::NotFound(
            "simulated abort".into(),
        )))
    });
    assert!(result.is_err());
    assert!(bucket.get("1").unwrap().is_none());
}

#[test]
fn view_reads_current_contents() {
    let (_dir, db) = open_temp();
    let bucket = Bucket::open(&db, "jobs").unwrap();
    bucket.insert("1", b"x".to_vec()).unwrap();
    let count = bucket.view(|tree| tree.iter().count());
    assert_eq!(count, 1);
}
