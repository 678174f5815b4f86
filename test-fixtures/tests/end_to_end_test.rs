//! The whole flow over the legacy fixture tree: import, classify what has
//! no verdict, reconcile, delete a bucket.

use std::sync::Arc;

use garden_cache::CacheCoordinator;
use garden_classifier::{refresh_stale, AnalysisPipeline, Classifier};
use garden_core::config::{CacheConfig, ClassifierConfig};
use garden_core::memory::Action;
use garden_core::traits::{IMemoryStore, IOblivionLog};
use garden_reconcile::{reconcile_store, CascadingDeleter};
use garden_storage::{import_legacy_dir, StorageEngine};
use test_fixtures::{legacy_root, load_fixture, load_fixture_text, model_response, ScriptedBackend};

#[test]
fn fixture_files_load() {
    let batch: serde_json::Value = load_fixture("legacy/memories/batch-1700000500.json");
    assert_eq!(batch.as_array().map(Vec::len), Some(2));
    assert!(load_fixture_text("legacy/clusters/truncated.json").starts_with('['));
}

#[tokio::test]
async fn import_classify_reconcile_delete() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(StorageEngine::open(&dir.path().join("garden.db")).unwrap());
    import_legacy_dir(&engine, &legacy_root()).unwrap();

    // Everything without a fresh model verdict is sent to the service.
    let backend = Arc::new(ScriptedBackend::always(model_response("delete", 0.1, 0.05, 0.0)));
    let pipeline = AnalysisPipeline::new(
        Classifier::new(
            backend.clone(),
            ClassifierConfig {
                batch_delay_ms: 0,
                ..Default::default()
            },
        ),
        Arc::new(CacheCoordinator::in_memory(&CacheConfig::default())),
    );
    let refreshed = refresh_stale(engine.as_ref(), &pipeline).await.unwrap();
    assert_eq!(refreshed, 6);

    let clusters = reconcile_store(engine.as_ref(), Some(engine.as_ref())).unwrap();
    // Overrides still decide m4 and m9.
    assert_eq!(clusters[Action::Keep.index()].memory_ids, vec!["m9"]);
    assert_eq!(clusters[Action::LowRelevance.index()].memory_ids, vec!["m4"]);
    assert_eq!(
        clusters[Action::Delete.index()].memory_ids,
        vec!["m1", "m2", "m3", "m5"]
    );

    let deleter = CascadingDeleter::new(engine.clone(), engine.clone(), engine.clone());
    let report = deleter.delete_bucket(Action::Delete).unwrap();
    assert_eq!(report.memories_deleted, 4);
    assert_eq!(engine.list().unwrap().len(), 4);

    let after = reconcile_store(engine.as_ref(), Some(engine.as_ref())).unwrap();
    assert!(after[Action::Delete.index()].memory_ids.is_empty());
    let remaining: Vec<String> = engine.list_all().unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(remaining, vec!["m4", "m9"]);
}
