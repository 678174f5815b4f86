//! v001: memories. The record itself is a JSON payload; id, creation time
//! and size are lifted into columns for ordering and totals.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS memories (
    id          TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,
    size        INTEGER NOT NULL DEFAULT 0,
    payload     TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_memories_created ON memories(created_at);
"#;
