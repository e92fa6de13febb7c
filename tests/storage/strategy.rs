//! Strategy selection through the factory and the bulk contract.

use crate::common::*;

fn roster() -> Vec<Student> {
    vec![
        graded(1, "Ann", &[("math", 91)]),
        graded(2, "Bob", &[("math", 64), ("history", 80)]),
        student(3, "Cid"),
    ]
}

fn exercise(storage: &mut dyn RecordStorage<Student>) {
    assert!(storage.load().unwrap().is_empty());

    storage.save(&roster()).unwrap();
    assert_eq!(storage.load().unwrap(), roster());

    storage.save(&roster()[1..]).unwrap();
    assert_eq!(ids(&storage.load().unwrap()), vec![2, 3]);

    storage.clear().unwrap();
    assert!(storage.load().unwrap().is_empty());
}

#[test]
fn every_available_kind_honors_the_contract() {
    let dir = tempfile::tempdir().unwrap();
    for kind in [StorageKind::SnapshotOnly, StorageKind::WriteAheadLog] {
        assert!(kind.is_available());
        let path = dir.path().join(format!("{}.json", kind));
        let mut storage =
            StorageFactory::create::<Student>(kind, &path, StoreConfig::for_testing()).unwrap();
        assert_eq!(storage.kind(), kind);
        exercise(storage.as_mut());
    }
}

#[test]
fn saved_data_is_visible_to_a_new_instance() {
    let dir = tempfile::tempdir().unwrap();
    for kind in [StorageKind::SnapshotOnly, StorageKind::WriteAheadLog] {
        let path = dir.path().join(format!("{}.json", kind));
        StorageFactory::create::<Student>(kind, &path, StoreConfig::default())
            .unwrap()
            .save(&roster())
            .unwrap();

        let mut again =
            StorageFactory::create::<Student>(kind, &path, StoreConfig::default()).unwrap();
        assert_eq!(again.load().unwrap(), roster(), "{}", kind);
    }
}

#[test]
fn both_kinds_share_the_snapshot_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.json");

    StorageFactory::create::<Student>(StorageKind::SnapshotOnly, &path, StoreConfig::default())
        .unwrap()
        .save(&roster())
        .unwrap();

    let mut wal = WalStore::<Student>::new(&path, StoreConfig::default()).unwrap();
    assert_eq!(wal.load_all().unwrap(), roster());
}

#[test]
fn database_kind_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = StorageFactory::create::<Student>(
        StorageKind::Database,
        dir.path().join("db"),
        StoreConfig::default(),
    );
    assert!(matches!(result, Err(StoreError::Unsupported(_))));
}

#[test]
fn recommendation_table() {
    let cases = [
        (10, 0, StorageKind::SnapshotOnly),
        (999, 9, StorageKind::SnapshotOnly),
        (1_000, 9, StorageKind::WriteAheadLog),
        (999, 10, StorageKind::WriteAheadLog),
        (99_999, 99, StorageKind::WriteAheadLog),
        (100_000, 99, StorageKind::WriteAheadLog),
        (100_001, 0, StorageKind::Database),
        (50_000, 1_000, StorageKind::WriteAheadLog),
    ];
    for (records, writes, expected) in cases {
        let rec = StorageFactory::recommend(records, writes);
        assert_eq!(rec.kind, expected, "records={} writes={}", records, writes);
        assert!(!rec.reason.is_empty());
    }
}
