//! Span definitions per operation: classification, reconciliation, deletion, cache.

/// Create a classification span.
#[macro_export]
macro_rules! classification_span {
    ($memory_id:expr, $fingerprint:expr) => {
        tracing::info_span!("garden.classification", memory_id = %$memory_id, fingerprint = %$fingerprint)
    };
}

/// Create a reconciliation span.
#[macro_export]
macro_rules! reconcile_span {
    ($memory_count:expr, $legacy_count:expr) => {
        tracing::info_span!(
            "garden.reconcile",
            memory_count = $memory_count,
            legacy_count = $legacy_count
        )
    };
}

/// Create a deletion span.
#[macro_export]
macro_rules! deletion_span {
    ($target:expr) => {
        tracing::info_span!("garden.deletion", target = %$target)
    };
}

/// Create a cache span.
#[macro_export]
macro_rules! cache_span {
    ($op:expr, $fingerprint:expr) => {
        tracing::debug_span!("garden.cache", op = %$op, fingerprint = %$fingerprint)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const CLASSIFICATION: &str = "garden.classification";
    pub const RECONCILE: &str = "garden.reconcile";
    pub const DELETION: &str = "garden.deletion";
    pub const CACHE: &str = "garden.cache";
}
