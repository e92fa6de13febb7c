//! Bulk save/clear on the WAL store and the snapshot-only store.

use crate::common::*;
use recordstore::SnapshotStore;
use std::fs;

#[test]
fn save_replaces_and_empties_log() {
    let mut ts = TestStore::new();
    ts.store.insert(student(1, "gone")).unwrap();
    ts.store.insert(student(2, "gone too")).unwrap();

    let info = ts
        .store
        .save(&[student(5, "e"), student(3, "c")])
        .unwrap();

    assert_eq!(info.trigger, CompactTrigger::BulkSave);
    assert_eq!(ts.log_size(), 0);
    assert_eq!(ts.store.operations_since_compact(), 0);

    ts.reopen();
    assert_eq!(ids(&ts.store.load_all().unwrap()), vec![3, 5]);
}

#[test]
fn save_discards_unreplayed_log() {
    let mut ts = TestStore::new();
    ts.store.insert(student(1, "a")).unwrap();

    ts.reopen();
    ts.store.save(&[student(9, "z")]).unwrap();
    assert!(ts.store.is_loaded());

    ts.reopen();
    assert_eq!(ids(&ts.store.load_all().unwrap()), vec![9]);
}

#[test]
fn save_then_mutate() {
    let mut ts = TestStore::new();
    ts.store.save(&[student(1, "a"), student(2, "b")]).unwrap();
    ts.store.delete(1).unwrap();
    ts.store.insert(student(3, "c")).unwrap();

    ts.reopen();
    assert_eq!(ids(&ts.store.load_all().unwrap()), vec![2, 3]);
}

#[test]
fn clear_empties_everything() {
    let mut ts = TestStore::new();
    ts.store.insert(student(1, "a")).unwrap();
    ts.store.force_compact().unwrap();
    ts.store.insert(student(2, "b")).unwrap();

    let info = ts.store.clear().unwrap();
    assert_eq!(info.trigger, CompactTrigger::Clear);
    assert_eq!(info.records_written, 0);

    let snapshot: Vec<Student> =
        serde_json::from_slice(&fs::read(ts.snapshot_path()).unwrap()).unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(ts.log_size(), 0);

    ts.reopen();
    assert_eq!(ts.store.count().unwrap(), 0);
}

#[test]
fn snapshot_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groups.json");
    let store = SnapshotStore::<Student>::new(&path);

    assert!(store.load().unwrap().is_empty());

    let records = vec![student(2, "b"), student(1, "a")];
    store.save(&records).unwrap();
    assert_eq!(store.load().unwrap(), records);

    let reopened = SnapshotStore::<Student>::new(&path);
    assert_eq!(reopened.load().unwrap(), records);

    reopened.clear().unwrap();
    assert!(store.load().unwrap().is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
}

#[test]
fn snapshot_store_never_writes_a_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groups.json");
    SnapshotStore::<Student>::new(&path)
        .save(&[student(1, "a")])
        .unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("groups.json")]);
}

#[test]
fn snapshot_store_reports_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groups.json");
    fs::write(&path, b"{ not an array").unwrap();

    let err = SnapshotStore::<Student>::new(&path).load().unwrap_err();
    assert!(err.is_corruption());
}

#[test]
fn failed_save_leaves_memory_matching_disk() {
    let mut ts = TestStore::new();
    ts.store.insert(student(1, "a")).unwrap();
    fs::create_dir(ts.store.paths().temp()).unwrap();

    assert!(ts.store.save(&[student(9, "z")]).is_err());
    assert_eq!(ids(&ts.store.load_all().unwrap()), vec![1]);
    assert!(ts.store.update(student(1, "a2")).is_ok());

    fs::remove_dir(ts.store.paths().temp()).unwrap();
    ts.reopen();
    assert_eq!(ts.store.load_by_id(1).unwrap().name, "a2");
}

#[test]
fn failed_clear_rebuilds_from_disk() {
    let mut ts = TestStore::new();
    ts.store.save(&[student(1, "a"), student(2, "b")]).unwrap();
    fs::create_dir(ts.store.paths().temp()).unwrap();

    assert!(ts.store.clear().is_err());
    assert!(!ts.store.is_loaded());

    fs::remove_dir(ts.store.paths().temp()).unwrap();
    assert_eq!(ids(&ts.store.load_all().unwrap()), vec![1, 2]);
    ts.store.delete(1).unwrap();
}
