use garden_core::config::ObservabilityConfig;
use garden_observability::tracing_setup::spans::names;
use garden_observability::{cache_span, classification_span, deletion_span, init_tracing, reconcile_span};

#[test]
fn second_init_is_a_no_op() {
    let config = ObservabilityConfig {
        log_level: "debug".into(),
        json_logs: true,
    };
    let first = init_tracing(&config);
    let second = init_tracing(&config);
    assert!(!second);
    assert!(first);
}

#[test]
fn spans_can_be_entered() {
    let fingerprint = "ab12";
    let _c = classification_span!("m1", fingerprint).entered();
    let _r = reconcile_span!(3usize, 1usize).entered();
    let _d = deletion_span!("bucket:delete").entered();
    let _k = cache_span!("get", fingerprint).entered();
    assert_eq!(names::CLASSIFICATION, "garden.classification");
    assert_eq!(names::CACHE, "garden.cache");
}
