//! Import of the legacy flat-file layout.

use garden_core::memory::{Action, MemoryKind};
use garden_core::traits::{IClusterRecordStore, IMemoryStore};
use garden_storage::{import_legacy_dir, ImportReport, StorageEngine};

#[test]
fn imports_fixture_tree() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let report = import_legacy_dir(&engine, &test_fixtures::legacy_root()).unwrap();
    assert_eq!(
        report,
        ImportReport {
            memories_imported: 6,
            memories_skipped: 2,
            cluster_payloads: 3,
            unreadable_files: 1,
        }
    );

    let ids: Vec<String> = engine.list_all().unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec!["m1", "m2", "m3", "m4", "m5", "m9"]);

    let m2 = engine.get("m2").unwrap().unwrap();
    assert_eq!(m2.size, 53_211);
    assert_eq!(m2.override_action, None);
    assert_eq!(m2.predicted_action, Some(Action::LowRelevance));

    let m4 = engine.get("m4").unwrap().unwrap();
    assert_eq!(m4.kind, MemoryKind::Email);
    assert_eq!(m4.override_action, Some(Action::LowRelevance));
    assert_eq!(m4.tags, vec!["housing", "contracts"]);

    let m1 = engine.get("m1").unwrap().unwrap();
    assert!(m1.analysis.as_ref().is_some_and(|a| a.model_derived));
    assert_eq!(m1.metadata.stored_filename.as_deref(), Some("1700000000-beach.jpg"));

    let keys: Vec<String> = engine.list_raw().unwrap().into_iter().map(|r| r.key).collect();
    assert_eq!(keys, vec!["cluster-single", "clusters-1690000000", "truncated"]);
}

#[test]
fn reimport_replaces_rather_than_duplicates() {
    let engine = StorageEngine::open_in_memory().unwrap();
    import_legacy_dir(&engine, &test_fixtures::legacy_root()).unwrap();
    import_legacy_dir(&engine, &test_fixtures::legacy_root()).unwrap();
    assert_eq!(engine.count().unwrap(), 6);
    assert_eq!(engine.list_raw().unwrap().len(), 3);
}

#[test]
fn missing_directories_import_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open_in_memory().unwrap();
    let report = import_legacy_dir(&engine, dir.path()).unwrap();
    assert_eq!(report, ImportReport::default());
}
