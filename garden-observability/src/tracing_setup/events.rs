//! Structured log events for key operations.

pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

pub fn component_recovered(component: &str, degraded_ms: i64) {
    tracing::info!(
        event = "component_recovered",
        component = %component,
        degraded_ms,
        "component recovered"
    );
}

pub fn memory_deleted(memory_id: &str, bucket: &str) {
    tracing::info!(
        event = "memory_deleted",
        memory_id = %memory_id,
        bucket = %bucket,
        "memory deleted"
    );
}

pub fn legacy_record_skipped(key: &str, reason: &str) {
    tracing::warn!(
        event = "legacy_record_skipped",
        key = %key,
        reason = %reason,
        "skipping unreadable legacy cluster record"
    );
}

pub fn bucket_deleted(bucket: &str, memories_deleted: usize, clusters_deleted: usize) {
    tracing::info!(
        event = "bucket_deleted",
        bucket = %bucket,
        memories_deleted = memories_deleted,
        clusters_deleted = clusters_deleted,
        "bucket deleted"
    );
}
