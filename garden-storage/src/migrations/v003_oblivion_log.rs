//! v003: oblivion log. Append-only; `seq` preserves insertion order.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS oblivion_log (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    memory_id   TEXT NOT NULL,
    summary     TEXT NOT NULL,
    bucket      TEXT NOT NULL,
    deleted_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_oblivion_memory ON oblivion_log(memory_id);
"#;
