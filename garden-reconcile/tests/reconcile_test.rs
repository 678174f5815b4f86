//! Reconciliation over stored memories and legacy records.

use garden_core::memory::Action;
use garden_core::models::StoredClusterRecord;
use garden_core::traits::{IClusterRecordStore, IMemoryStore};
use garden_reconcile::{reconcile_store, set_override, clear_override};
use garden_storage::{import_legacy_dir, StorageEngine};
use test_fixtures::{cluster_record_json, MemoryBuilder};

fn ids(clusters: &[garden_core::Cluster], action: Action) -> Vec<String> {
    clusters[action.index()].memory_ids.clone()
}

#[test]
fn legacy_fixture_tree_reconciles() {
    let engine = StorageEngine::open_in_memory().unwrap();
    import_legacy_dir(&engine, &test_fixtures::legacy_root()).unwrap();

    let clusters = reconcile_store(&engine, Some(&engine)).unwrap();
    assert_eq!(ids(&clusters, Action::Keep), vec!["m1", "m5", "m9"]);
    assert!(ids(&clusters, Action::Compress).is_empty());
    assert_eq!(ids(&clusters, Action::LowRelevance), vec!["m2", "m3", "m4"]);
    assert!(ids(&clusters, Action::Delete).is_empty());

    let low = &clusters[Action::LowRelevance.index()];
    assert_eq!(low.total_size, 53_211 + 88_000 + 4_096);
    assert_eq!(low.name, "Low Future Relevance");
}

#[test]
fn override_forget_beats_stored_keep_analysis() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let memory = MemoryBuilder::new("m").analyzed(Action::Keep).build();
    engine.create(&memory).unwrap();
    set_override(&engine, "m", "forget").unwrap();

    let clusters = reconcile_store(&engine, None).unwrap();
    assert_eq!(ids(&clusters, Action::LowRelevance), vec!["m"]);
    assert!(ids(&clusters, Action::Keep).is_empty());

    clear_override(&engine, "m").unwrap();
    let clusters = reconcile_store(&engine, None).unwrap();
    assert_eq!(ids(&clusters, Action::Keep), vec!["m"]);
}

#[test]
fn override_beats_legacy_compress_record() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .create(&MemoryBuilder::new("m9").override_action(Action::Keep).build())
        .unwrap();
    engine
        .put_raw(&StoredClusterRecord {
            key: "clusters-1".into(),
            payload: cluster_record_json("c1", "Compress later", Some("compress"), &["m9"]).to_string(),
        })
        .unwrap();

    let clusters = reconcile_store(&engine, Some(&engine)).unwrap();
    assert_eq!(ids(&clusters, Action::Keep), vec!["m9"]);
    assert!(ids(&clusters, Action::Compress).is_empty());
}

#[test]
fn legacy_hint_applies_without_own_verdict() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.create(&MemoryBuilder::new("m").build()).unwrap();
    engine
        .put_raw(&StoredClusterRecord {
            key: "clusters-1".into(),
            payload: cluster_record_json("c1", "Whatever", Some("DELETE"), &["m"]).to_string(),
        })
        .unwrap();

    let clusters = reconcile_store(&engine, Some(&engine)).unwrap();
    assert_eq!(ids(&clusters, Action::Delete), vec!["m"]);
}

#[test]
fn blank_override_clears() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .create(&MemoryBuilder::new("m").override_action(Action::Delete).build())
        .unwrap();
    let memory = set_override(&engine, "m", "  ").unwrap();
    assert_eq!(memory.override_action, None);
    assert!(!memory.user_overridden);
    assert!(set_override(&engine, "missing", "keep").is_err());
}
