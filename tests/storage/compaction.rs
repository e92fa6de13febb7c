//! Automatic and explicit compaction as seen from the files on disk.

use crate::common::*;
use std::fs;

fn snapshot_ids(ts: &TestStore) -> Vec<RecordId> {
    let records: Vec<Student> =
        serde_json::from_slice(&fs::read(ts.snapshot_path()).unwrap()).unwrap();
    ids(&records)
}

#[test]
fn threshold_folds_log_into_snapshot() {
    let mut ts = TestStore::with_threshold(5);
    for id in 1..=4 {
        ts.store.insert(student(id, "x")).unwrap();
    }
    assert_eq!(ts.log_lines(), 4);
    assert!(!ts.snapshot_path().exists());

    ts.store.delete(2).unwrap();

    assert_eq!(ts.log_size(), 0);
    assert_eq!(snapshot_ids(&ts), vec![1, 3, 4]);
    assert_eq!(ts.store.operations_since_compact(), 0);
    assert!(ts.store.deleted_ids().is_empty());

    let info = ts.store.last_compaction().unwrap();
    assert_eq!(info.trigger, CompactTrigger::Threshold);
    assert_eq!(info.frames_compacted, 5);
    assert_eq!(info.records_written, 3);
    assert!(info.log_bytes_reclaimed > 0);
}

#[test]
fn default_threshold_is_fifty() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = WalStore::<Student>::new(dir.path().join("s.json"), StoreConfig::default())
        .unwrap();

    for id in 0..49 {
        store.insert(student(id, "x")).unwrap();
    }
    assert_eq!(store.operations_since_compact(), 49);
    assert!(store.last_compaction().is_none());

    store.insert(student(49, "x")).unwrap();
    assert_eq!(store.operations_since_compact(), 0);
    assert_eq!(store.last_compaction().unwrap().records_written, 50);
}

#[test]
fn replayed_frames_count_toward_threshold() {
    let mut ts = TestStore::with_threshold(4);
    ts.store.insert(student(1, "a")).unwrap();
    ts.store.insert(student(2, "b")).unwrap();
    ts.store.insert(student(3, "c")).unwrap();

    ts.reopen();
    assert_eq!(ts.store.count().unwrap(), 3);
    assert_eq!(ts.store.operations_since_compact(), 3);

    ts.store.update(student(1, "a2")).unwrap();
    assert_eq!(ts.log_size(), 0);
    assert_eq!(snapshot_ids(&ts), vec![1, 2, 3]);
}

#[test]
fn repeated_compaction_is_stable() {
    let mut ts = TestStore::new();
    for id in [3, 1, 2] {
        ts.store.insert(graded(id, "x", &[("math", 70)])).unwrap();
    }

    ts.store.force_compact().unwrap();
    let first = fs::read(ts.snapshot_path()).unwrap();
    let info = ts.store.force_compact().unwrap();
    let second = fs::read(ts.snapshot_path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(info.trigger, CompactTrigger::Explicit);
    assert_eq!(info.frames_compacted, 0);
    assert_eq!(info.log_bytes_reclaimed, 0);
}

#[test]
fn snapshot_is_sorted_pretty_json() {
    let mut ts = TestStore::new();
    ts.store.insert(student(20, "b")).unwrap();
    ts.store.insert(student(10, "a")).unwrap();
    ts.store.force_compact().unwrap();

    let text = fs::read_to_string(ts.snapshot_path()).unwrap();
    assert!(text.starts_with('['));
    assert!(text.contains('\n'));
    assert_eq!(snapshot_ids(&ts), vec![10, 20]);
}

#[test]
fn compaction_leaves_no_temp_file() {
    let mut ts = TestStore::with_threshold(2);
    ts.store.insert(student(1, "a")).unwrap();
    ts.store.insert(student(2, "b")).unwrap();

    assert!(ts.snapshot_path().exists());
    assert!(!ts.store.paths().temp().exists());
}

#[test]
fn failed_compaction_keeps_the_log() {
    let mut ts = TestStore::with_threshold(2);
    ts.store.insert(student(1, "a")).unwrap();

    // Block the temp snapshot path so the write fails
    fs::create_dir(ts.store.paths().temp()).unwrap();

    let err = ts.store.insert(student(2, "b")).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));

    // The mutation itself was logged before compaction ran
    assert!(ts.store.exists(2).unwrap());
    assert_eq!(ts.log_lines(), 2);
    assert!(!ts.snapshot_path().exists());

    fs::remove_dir(ts.store.paths().temp()).unwrap();
    ts.reopen();
    assert_eq!(ids(&ts.store.load_all().unwrap()), vec![1, 2]);
}

#[test]
fn summary_mentions_trigger_and_counts() {
    let mut ts = TestStore::new();
    ts.store.insert(student(1, "a")).unwrap();
    let summary = ts.store.force_compact().unwrap().summary();

    assert!(summary.contains("explicit"), "{}", summary);
    assert!(summary.contains('1'), "{}", summary);
}

#[test]
fn failed_threshold_compaction_stays_pending() {
    let mut ts = TestStore::with_threshold(2);
    ts.store.insert(student(1, "a")).unwrap();
    fs::create_dir(ts.store.paths().temp()).unwrap();

    assert!(ts.store.insert(student(2, "b")).is_err());
    assert!(ts.store.compaction_pending());

    // The insert is durable even though the call failed
    assert!(ts.store.insert(student(2, "b")).unwrap_err().is_conflict());

    fs::remove_dir(ts.store.paths().temp()).unwrap();
    ts.store.insert(student(3, "c")).unwrap();
    assert!(!ts.store.compaction_pending());
    assert_eq!(ts.log_size(), 0);
    assert_eq!(snapshot_ids(&ts), vec![1, 2, 3]);
}
