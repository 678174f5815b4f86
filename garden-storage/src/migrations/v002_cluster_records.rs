//! v002: legacy cluster payloads, kept verbatim and interpreted on read.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS cluster_records (
    key         TEXT PRIMARY KEY,
    payload     TEXT NOT NULL,
    stored_at   TEXT NOT NULL
);
"#;
